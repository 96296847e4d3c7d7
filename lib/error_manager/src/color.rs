#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Normal,
    Bold,
    Red,
    Blue,
    BoldRed,
    BoldBlue,
}

/// ANSI escape for the given color. Empty when stderr is not a tty.
pub fn set_color(color: Color) -> &'static str {
    if !colors_enabled() {
        return "";
    }
    match color {
        Color::Normal => "\x1b[0m",
        Color::Bold => "\x1b[0m\x1b[1m",
        Color::Red => "\x1b[0;31m",
        Color::Blue => "\x1b[0;34m",
        Color::BoldRed => "\x1b[1;31m",
        Color::BoldBlue => "\x1b[1;34m",
    }
}

fn colors_enabled() -> bool {
    use std::io::IsTerminal;
    use std::sync::OnceLock;

    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::io::stderr().is_terminal())
}
