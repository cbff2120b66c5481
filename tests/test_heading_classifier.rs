//! Integration tests for the font profile and heading classifier.

use docstruct::layout::{
    FontProfile, HeadingClassifier, HeadingLevel, Line, LineContext, OutlineLevel, Page,
};
use proptest::prelude::*;

fn line(text: &str, y0: f32, size: f32) -> Line {
    Line::new(text, 50.0, y0, 450.0, y0 + size, size)
}

/// Two pages of a textbook after header/footer removal.
fn textbook() -> Vec<Page> {
    vec![
        Page::new(vec![
            line("ГЛАВА 1. ВВЕДЕНИЕ", 700.0, 18.0),
            line("Текст первого абзаца.", 660.0, 10.0),
        ]),
        Page::new(vec![
            line("Подраздел А", 700.0, 12.0).with_bold(true),
            line("Продолжение текста.", 680.0, 10.0),
        ]),
    ]
}

#[test]
fn test_profile_from_pages() {
    let profile = FontProfile::build(&textbook());
    assert_eq!(profile.median_size, 11.0);
    assert_eq!(profile.p75_size, 18.0);
    assert_eq!(profile.p90_size, 18.0);
}

#[test]
fn test_profile_ignores_noise_sizes() {
    let pages = vec![Page::new(vec![
        line("Текст", 700.0, 10.0),
        line("1", 600.0, 120.0),
        line("сноска", 500.0, 4.0),
        Line::text_only("без геометрии").with_bold(true),
    ])];
    let profile = FontProfile::build(&pages);
    assert_eq!(profile.median_size, 10.0);
    assert_eq!(profile.p90_size, 10.0);
}

#[test]
fn test_profile_fallback_for_empty_document() {
    assert_eq!(FontProfile::build(&[]), FontProfile::fallback());
}

#[test]
fn test_textbook_lines_classified() {
    let pages = textbook();
    let classifier = HeadingClassifier::new(FontProfile::build(&pages));
    let levels: Vec<HeadingLevel> = pages
        .iter()
        .flat_map(|page| {
            let contexts = LineContext::for_lines(&page.lines);
            page.lines
                .iter()
                .zip(contexts)
                .map(|(l, ctx)| classifier.classify(l, ctx))
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(
        levels,
        vec![HeadingLevel::Chapter, HeadingLevel::Body, HeadingLevel::Section, HeadingLevel::Body]
    );
}

#[test]
fn test_first_line_of_page_satisfies_spacing() {
    let profile = FontProfile {
        median_size: 10.0,
        p75_size: 14.0,
        p90_size: 18.0,
        spacing_reference: 12.0,
    };
    let classifier = HeadingClassifier::new(profile);
    let plain = line("Введение", 700.0, 18.0);
    assert_eq!(classifier.classify(&plain, LineContext::top_of_page()), HeadingLevel::Chapter);
    assert_eq!(classifier.classify(&plain, LineContext::with_spacing(1.0)), HeadingLevel::Section);
}

const TEXTS: &[&str] = &[
    "Введение",
    "ГЛАВА 2",
    "2.1 Методы",
    "ОСНОВНЫЕ ПОНЯТИЯ",
    "Обычная строка текста",
    "Предложение с точкой.",
    "42",
];

#[test]
fn test_rare_heading_profile_keeps_body_lines() {
    let mut lines = vec![line("ГЛАВА 1. ВВЕДЕНИЕ", 700.0, 18.0)];
    for i in 0..12 {
        lines.push(line("Обычная строка текста", 680.0 - 12.0 * i as f32, 10.0));
    }
    let pages = vec![Page::new(lines)];
    let profile = FontProfile::build(&pages);
    assert_eq!(profile.p75_size, profile.median_size);
    assert_eq!(profile.p90_size, profile.median_size);

    let classifier = HeadingClassifier::new(profile);
    let contexts = LineContext::for_lines(&pages[0].lines);
    let levels: Vec<HeadingLevel> = pages[0]
        .lines
        .iter()
        .zip(contexts)
        .map(|(l, ctx)| classifier.classify(l, ctx))
        .collect();
    assert_eq!(levels[0], HeadingLevel::Chapter);
    assert!(levels[1..].iter().all(|level| *level == HeadingLevel::Body));
    assert_eq!(
        classifier.classify_outline(&pages[0].lines[1], LineContext::top_of_page()),
        OutlineLevel::Body
    );
}

fn arb_profile() -> impl Strategy<Value = FontProfile> {
    (16u32..60, 0u32..20, 0u32..20, 0.0f32..30.0).prop_map(|(median, d75, d90, spacing)| {
        let median = median as f32 / 2.0;
        FontProfile {
            median_size: median,
            p75_size: median + d75 as f32 / 2.0,
            p90_size: median + d75 as f32 / 2.0 + d90 as f32 / 2.0,
            spacing_reference: spacing,
        }
    })
}

proptest! {
    #[test]
    fn prop_larger_size_never_lowers_level(
        profile in arb_profile(),
        text in 0..TEXTS.len(),
        bold in any::<bool>(),
        spacing in prop::option::of(0.0f32..40.0),
        small in 4.0f32..60.0,
        delta in 0.0f32..30.0,
    ) {
        let classifier = HeadingClassifier::new(profile);
        let ctx = LineContext { spacing };
        let a = line(TEXTS[text], 500.0, small).with_bold(bold);
        let b = line(TEXTS[text], 500.0, small + delta).with_bold(bold);

        prop_assert!(classifier.classify(&b, ctx) >= classifier.classify(&a, ctx));
        prop_assert!(classifier.classify_outline(&b, ctx) >= classifier.classify_outline(&a, ctx));
    }

    #[test]
    fn prop_outline_collapses_consistently(
        profile in arb_profile(),
        text in 0..TEXTS.len(),
        bold in any::<bool>(),
        size in 4.0f32..60.0,
    ) {
        let classifier = HeadingClassifier::new(profile);
        let l = line(TEXTS[text], 500.0, size).with_bold(bold);
        let ctx = LineContext::top_of_page();
        let outline = classifier.classify_outline(&l, ctx);
        let two_level = classifier.classify(&l, ctx);
        if outline == OutlineLevel::Chapter {
            prop_assert_eq!(two_level, HeadingLevel::Chapter);
        }
        if outline == OutlineLevel::Body {
            prop_assert_eq!(two_level, HeadingLevel::Body);
        }
    }
}
