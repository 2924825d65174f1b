//! CSS variable block derived from a theme.

use super::palette::{Theme, hex_to_rgb, normalize_theme};
use std::fmt::Write;

/// Space-separated channel triplet, e.g. `34 34 34`.
fn rgb_triplet(hex: &str) -> String {
    let [r, g, b] = hex_to_rgb(hex);
    format!("{r} {g} {b}")
}

/// Build the full `:root` + `.dark` variable block for a theme.
///
/// The input is renormalized first, so any `Theme` value is accepted.
pub fn build_theme_css(theme: &Theme) -> String {
    let t = normalize_theme(&theme.to_map());
    let primary_rgb = rgb_triplet(&t.primary);
    let secondary_rgb = rgb_triplet(&t.secondary);
    let tertiary_rgb = rgb_triplet(&t.tertiary);
    let white_rgb = rgb_triplet(&t.white);

    let mut css = String::with_capacity(2048);

    // Light (root) variables
    let root: [(&str, String); 37] = [
        ("--primary", t.primary.clone()),
        ("--secondary", t.secondary.clone()),
        ("--tertiary", t.tertiary.clone()),
        ("--white", t.white.clone()),
        ("--primary-rgb", primary_rgb.clone()),
        ("--secondary-rgb", secondary_rgb.clone()),
        ("--tertiary-rgb", tertiary_rgb),
        ("--white-rgb", white_rgb.clone()),
        ("--bg", "var(--white)".into()),
        ("--surface", "var(--tertiary)".into()),
        ("--text", "var(--primary)".into()),
        ("--muted", "var(--secondary)".into()),
        ("--border", format!("rgb({primary_rgb} / 0.12)")),
        ("--border-strong", format!("rgb({primary_rgb} / 0.24)")),
        ("--shadow", format!("rgb({primary_rgb} / 0.18)")),
        ("--acc-from", "var(--primary)".into()),
        ("--acc-to", "var(--secondary)".into()),
        ("--focus-ring", format!("rgb({primary_rgb} / 0.35)")),
        ("--selection", format!("rgb({secondary_rgb} / 0.35)")),
        ("--radius", "16px".into()),
        ("--tone-rgb", primary_rgb.clone()),
        // Legacy aliases still read by older section styles
        ("--theme-bg-light-start", "var(--bg)".into()),
        ("--theme-bg-light-mid", "var(--surface)".into()),
        ("--theme-bg-light-end", "var(--surface)".into()),
        ("--theme-bg-dark-start", "var(--bg)".into()),
        ("--theme-bg-dark-mid", "var(--surface)".into()),
        ("--theme-bg-dark-end", "var(--surface)".into()),
        ("--theme-text-body-dark", "var(--text)".into()),
        ("--theme-text-secondary-dark", "var(--muted)".into()),
        ("--theme-text-muted-dark", "var(--muted)".into()),
        ("--theme-card-border", "var(--border)".into()),
        ("--theme-card-bg-start", "var(--surface)".into()),
        ("--theme-card-bg-end", "var(--surface)".into()),
        ("--theme-card-shadow", "var(--shadow)".into()),
        ("--theme-chip-active-bg", "var(--acc-from)".into()),
        ("--theme-progress-track", "var(--border)".into()),
        ("--neon-accent", "var(--acc-to)".into()),
    ];

    let dark: [(&str, String); 10] = [
        ("--bg", "var(--primary)".into()),
        ("--surface", format!("rgb({white_rgb} / 0.08)")),
        ("--text", "var(--white)".into()),
        ("--muted", format!("rgb({white_rgb} / 0.7)")),
        ("--border", format!("rgb({white_rgb} / 0.14)")),
        ("--border-strong", format!("rgb({white_rgb} / 0.28)")),
        ("--shadow", format!("rgb({primary_rgb} / 0.6)")),
        ("--focus-ring", format!("rgb({white_rgb} / 0.4)")),
        ("--selection", format!("rgb({white_rgb} / 0.2)")),
        ("--tone-rgb", white_rgb.clone()),
    ];

    write_block(&mut css, ":root", &root);
    css.push('\n');
    write_block(&mut css, ".dark", &dark);
    css
}

fn write_block(css: &mut String, selector: &str, vars: &[(&str, String)]) {
    let _ = writeln!(css, "{selector} {{");
    for (name, value) in vars {
        let _ = writeln!(css, "  {name}: {value};");
    }
    css.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_css_contains_palette_and_triplets() {
        let css = build_theme_css(&Theme::default());
        assert!(css.contains("--primary: #222222;"));
        assert!(css.contains("--primary-rgb: 34 34 34;"));
        assert!(css.contains("--white-rgb: 255 255 255;"));
        assert!(css.contains("--border: rgb(34 34 34 / 0.12);"));
        assert!(css.contains("--neon-accent: var(--acc-to);"));
    }

    #[test]
    fn test_css_has_dark_block() {
        let css = build_theme_css(&Theme::default());
        let dark = css.split(".dark {").nth(1).expect("dark block");
        assert!(dark.contains("--bg: var(--primary);"));
        assert!(dark.contains("--tone-rgb: 255 255 255;"));
    }

    #[test]
    fn test_css_renormalizes_raw_theme() {
        let raw = Theme {
            primary: "#ff0000".into(),
            secondary: "bogus".into(),
            tertiary: "#fff".into(),
            white: "#FFFFFF".into(),
        };
        let css = build_theme_css(&raw);
        assert!(css.contains("--primary: #363636;"));
        assert!(css.contains("--secondary: #7B7B7B;"));
    }

    #[test]
    fn test_css_deterministic() {
        let theme = normalize_theme(json!({ "primary": "#0a0a0a" }).as_object().unwrap());
        assert_eq!(build_theme_css(&theme), build_theme_css(&theme));
    }
}
