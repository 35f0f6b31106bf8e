use console::{Term, style};
use weather_lookup_core::render::{Accent, GridLayout, Palette, Tone};

/// Colors for a terminal; `console` drops them when stdout is not a tty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPalette;

impl Palette for TerminalPalette {
    fn tone(&self, tone: Tone, text: &str) -> String {
        match tone {
            Tone::Success => style(text).green().bold().to_string(),
            Tone::Failure => style(text).red().bold().to_string(),
        }
    }

    fn accent(&self, accent: Accent, text: &str) -> String {
        let styled = style(text).bold();
        match accent {
            Accent::Blue => styled.blue(),
            Accent::Gray => styled.white().dim(),
            Accent::Purple => styled.magenta(),
            Accent::Emerald => styled.green(),
            Accent::Yellow => styled.yellow(),
        }
        .to_string()
    }

    fn strong(&self, text: &str) -> String {
        style(text).bold().to_string()
    }

    fn dim(&self, text: &str) -> String {
        style(text).dim().to_string()
    }
}

pub fn layout_for(term: &Term) -> GridLayout {
    let (_rows, cols) = term.size();
    GridLayout::for_width(cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncolored_output_keeps_text() {
        console::set_colors_enabled(false);
        let palette = TerminalPalette;

        assert_eq!(palette.tone(Tone::Failure, "boom"), "boom");
        assert_eq!(palette.accent(Accent::Emerald, "👁️ Visibility"), "👁️ Visibility");
        assert_eq!(palette.strong("Paris"), "Paris");
    }
}
