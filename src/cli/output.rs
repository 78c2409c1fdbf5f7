//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, commands
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, secret names, hints
//! - Bold: headers, values
//! - Dim: secondary info
//!
//! Status lines go to stderr so that `get` and `export` stay pipeable.

use std::fmt::Display;

use console::{style, StyledObject};

const RULE_WIDTH: usize = 56;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && console::colors_enabled_stderr()
}

fn paint<F>(text: &str, f: F) -> String
where
    F: FnOnce(StyledObject<&str>) -> StyledObject<&str>,
{
    if colors_enabled() {
        f(style(text)).force_styling(true).to_string()
    } else {
        text.to_string()
    }
}

/// `✓ initialized vault`
pub fn success(msg: &str) {
    eprintln!("{} {}", paint("✓", |s| s.green()), msg);
}

/// `✗ secret not found: TOKEN`
pub fn error(msg: &str) {
    eprintln!("{} {}", paint("✗", |s| s.red()), msg);
}

/// `⚠ private key is not configured`
pub fn warn(msg: &str) {
    eprintln!("{} {}", paint("⚠", |s| s.yellow()), msg);
}

/// `→ run: cellar init`
pub fn hint(msg: &str) {
    eprintln!("{} {}", paint("→", |s| s.cyan()), paint(msg, |s| s.cyan()));
}

pub fn header(title: &str) {
    eprintln!("{}", paint(title, |s| s.bold()));
}

/// `  label  value`, label dimmed and value bold.
pub fn kv(label: &str, value: impl Display) {
    let value = value.to_string();
    eprintln!(
        "  {}  {}",
        paint(&format!("{:<12}", label), |s| s.dim()),
        paint(&value, |s| s.bold())
    );
}

/// Data bullet on stdout, for listings a script may consume.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Status bullet on stderr.
pub fn item(item: &str) {
    eprintln!("  • {}", item);
}

pub fn rule() {
    eprintln!("{}", paint(&"─".repeat(RULE_WIDTH), |s| s.dim()));
}

pub fn dimmed(msg: &str) {
    eprintln!("{}", paint(msg, |s| s.dim()));
}

/// Path, styled for inline use.
pub fn path(p: impl Display) -> String {
    paint(&p.to_string(), |s| s.cyan())
}

/// Command, styled for inline use.
pub fn cmd(c: &str) -> String {
    paint(c, |s| s.green())
}

/// Secret name, styled for inline use.
pub fn key(k: &str) -> String {
    paint(k, |s| s.cyan())
}

/// Unstyled data on stdout.
pub fn raw(data: &str) {
    print!("{}", data);
}
