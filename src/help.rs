use crate::terminal::Terminal;
use crossterm::style::Color;

/// Key bindings shown by `?`
pub const HELP: &str = "\
FLIGHTGLOBE
─────────────────────────
drag / ←→↑↓   Orbit
wheel / +/-   Zoom in/out
r             Auto-rotate on/off
c             Next globe color
h             HUD on/off
l             Reload settings file
space         Pause
?             Close help
q/Esc         Quit";

/// Render a centered help overlay box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, width: u16, height: u16, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2;

    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;

    let border = Some(Color::White);
    let text = Some(Color::Grey);
    let horizontal = "─".repeat(box_width - 2);

    term.set_str(start_x as i32, start_y as i32, &format!("┌{}┐", horizontal), border, false);

    for (i, line) in lines.iter().enumerate() {
        let y = (start_y + 1 + i) as i32;
        let padding = max_width.saturating_sub(line.chars().count());
        term.set(start_x as i32, y, '│', border, false);
        term.set_str(start_x as i32 + 1, y, &format!(" {}{} ", line, " ".repeat(padding)), text, false);
        term.set((start_x + box_width - 1) as i32, y, '│', border, false);
    }

    let bottom_y = (start_y + box_height - 1) as i32;
    term.set_str(start_x as i32, bottom_y, &format!("└{}┘", horizontal), border, false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_is_boxed_and_centered() {
        let mut term = Terminal::headless(40, 20);
        render_help_overlay(&mut term, 40, 20, "ab\ncdef");
        // box is 8 wide and 4 tall
        assert_eq!(term.cell(16, 8).map(|c| c.ch), Some('┌'));
        assert_eq!(term.cell(23, 8).map(|c| c.ch), Some('┐'));
        assert_eq!(term.cell(18, 9).map(|c| c.ch), Some('a'));
        assert_eq!(term.cell(16, 11).map(|c| c.ch), Some('└'));
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut term = Terminal::headless(10, 5);
        render_help_overlay(&mut term, 10, 5, "");
        assert_eq!(term.cell(0, 0).map(|c| c.ch), Some(' '));
    }
}
