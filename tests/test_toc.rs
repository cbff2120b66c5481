//! Integration tests for table-of-contents detection and level override.

use docstruct::layout::{FontProfile, HeadingClassifier, HeadingLevel, Line, LineContext, OutlineLevel, Page};
use docstruct::structure::{DotLeaderToc, NoToc, TocEntry, TocStrategy, TocTable};
use docstruct::{StructureConfig, StructurePipeline};

fn line(text: &str, x0: f32, y0: f32, size: f32) -> Line {
    Line::new(text, x0, y0, 450.0, y0 + size, size)
}

/// A contents page followed by the headings it lists.
fn book() -> Vec<Page> {
    vec![
        Page::new(vec![
            line("СОДЕРЖАНИЕ", 50.0, 700.0, 16.0),
            line("Введение ........ 2", 50.0, 680.0, 10.0),
            line("Основы ........ 3", 70.0, 668.0, 10.0),
            line("Методы ........ 4", 50.0, 656.0, 10.0),
        ]),
        Page::new(vec![
            line("Введение", 50.0, 700.0, 16.0),
            line("Текст введения.", 50.0, 680.0, 10.0),
            line("Основы", 50.0, 640.0, 16.0),
            line("Текст основ.", 50.0, 620.0, 10.0),
            line("Методы", 50.0, 580.0, 16.0),
            line("Текст методов.", 50.0, 560.0, 10.0),
        ]),
    ]
}

fn titles(config: StructureConfig) -> Vec<String> {
    StructurePipeline::new(config)
        .structure_pages("book.pdf", book())
        .chapters
        .into_iter()
        .map(|c| c.title)
        .collect()
}

#[test]
fn test_dot_leader_detection() {
    let table = DotLeaderToc::new().build(&book());
    let entries: Vec<TocEntry> = table.entries().collect();
    assert_eq!(
        entries,
        vec![
            TocEntry {
                normalized_title: "введение".to_string(),
                level: 0
            },
            TocEntry {
                normalized_title: "основы".to_string(),
                level: 1
            },
            TocEntry {
                normalized_title: "методы".to_string(),
                level: 0
            },
        ]
    );
}

#[test]
fn test_too_few_entries_gives_no_table() {
    let pages = vec![Page::new(vec![
        line("Введение ........ 2", 50.0, 680.0, 10.0),
        line("Основы ........ 3", 70.0, 668.0, 10.0),
    ])];
    assert!(DotLeaderToc::new().build(&pages).is_empty());
    assert_eq!(DotLeaderToc::new().with_min_entries(2).build(&pages).len(), 2);
}

#[test]
fn test_toc_overrides_heuristic_level() {
    // Without contents "Основы" is large and well spaced: a chapter
    assert_eq!(
        titles(StructureConfig::default().with_toc(false)),
        vec!["СОДЕРЖАНИЕ", "Введение", "Основы", "Методы"]
    );
    // The indented contents entry makes it a section
    assert_eq!(titles(StructureConfig::default()), vec!["СОДЕРЖАНИЕ", "Введение", "Методы"]);

    let doc = StructurePipeline::new(StructureConfig::default()).structure_pages("book.pdf", book());
    let introduction = &doc.chapters[1];
    assert_eq!(introduction.paragraphs[1].headers, vec!["Основы".to_string()]);
    assert_eq!(introduction.paragraphs[1].text, "Текст основ.");
}

#[test]
fn test_toc_forces_body_size_line() {
    let profile = FontProfile {
        median_size: 10.0,
        p75_size: 14.0,
        p90_size: 18.0,
        spacing_reference: 12.0,
    };
    let table = TocTable::from_entries(vec![
        TocEntry {
            normalized_title: "приложение".to_string(),
            level: 0,
        },
        TocEntry {
            normalized_title: "словарь терминов".to_string(),
            level: 2,
        },
    ]);
    let classifier = HeadingClassifier::new(profile).with_toc(table);
    let ctx = LineContext::with_spacing(2.0);

    let appendix = line("Приложение", 50.0, 500.0, 10.0);
    assert_eq!(classifier.classify(&appendix, ctx), HeadingLevel::Chapter);
    assert_eq!(classifier.classify_outline(&appendix, ctx), OutlineLevel::Chapter);

    let glossary = line("Словарь   терминов", 50.0, 500.0, 10.0);
    assert_eq!(classifier.classify(&glossary, ctx), HeadingLevel::Section);
    assert_eq!(classifier.classify_outline(&glossary, ctx), OutlineLevel::Block);

    // The contents line itself is never promoted
    let entry = line("Приложение ...... 90", 50.0, 500.0, 10.0);
    assert_eq!(classifier.classify(&entry, ctx), HeadingLevel::Body);
}

#[test]
fn test_numbered_exercises_are_not_contents() {
    let pages = vec![Page::new(vec![
        line("Упражнение 12", 50.0, 700.0, 10.0),
        line("Задача 3. Найти 15", 50.0, 680.0, 10.0),
        line("Рис. 5", 50.0, 660.0, 10.0),
        line("Ответ: 42", 50.0, 640.0, 10.0),
    ])];
    assert!(DotLeaderToc::new().with_min_entries(1).build(&pages).is_empty());
}

struct FixedToc(Vec<TocEntry>);

impl TocStrategy for FixedToc {
    fn build(&self, _pages: &[Page]) -> TocTable {
        TocTable::from_entries(self.0.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[test]
fn test_custom_strategy() {
    let strategy = FixedToc(vec![TocEntry {
        normalized_title: "методы".to_string(),
        level: 1,
    }]);
    let pipeline = StructurePipeline::new(StructureConfig::default()).with_toc_strategy(Box::new(strategy));
    let doc = pipeline.structure_pages("book.pdf", book());
    let titles: Vec<&str> = doc.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["СОДЕРЖАНИЕ", "Введение", "Основы"]);
    let last = &doc.chapters[2].paragraphs;
    assert_eq!(last.last().map(|p| p.headers.clone()), Some(vec!["Методы".to_string()]));
    assert_eq!(NoToc.name(), "none");
    assert!(NoToc.build(&book()).is_empty());
}
