//! Integration tests for paragraph segmentation and hyphenation repair.

use docstruct::layout::{Line, LineJoin, ParagraphSegmenter};
use docstruct::text::HyphenationHandler;
use proptest::prelude::*;

fn line(text: &str, x0: f32, y0: f32) -> Line {
    Line::new(text, x0, y0, 450.0, y0 + 10.0, 10.0)
}

#[test]
fn test_block_of_wrapped_lines() {
    let lines = vec![
        line("Физика изучает наиболее общие", 50.0, 700.0),
        line("закономерности явлений приро-", 50.0, 688.0),
        line("ды.", 50.0, 676.0),
        // 20pt gap: new paragraph
        line("Механика является разделом", 50.0, 646.0),
        line("физики.", 50.0, 634.0),
        // indentation jump: new paragraph
        line("Кинематика описывает движение.", 80.0, 622.0),
    ];
    let paragraphs = ParagraphSegmenter::new(LineJoin::Space).segment(&lines);
    assert_eq!(
        paragraphs,
        vec![
            "Физика изучает наиболее общие закономерности явлений природы.",
            "Механика является разделом физики.",
            "Кинематика описывает движение.",
        ]
    );
}

#[test]
fn test_newline_join_keeps_line_structure() {
    let lines = vec![line("Первая строка", 50.0, 700.0), line("вторая строка", 50.0, 688.0)];
    let paragraphs = ParagraphSegmenter::new(LineJoin::Newline).segment(&lines);
    assert_eq!(paragraphs, vec!["Первая строка\nвторая строка"]);
}

#[test]
fn test_hyphen_before_non_letter_is_kept() {
    let handler = HyphenationHandler::new();
    assert_eq!(handler.join_lines(["Диапазон 10-", "20 метров"], " "), "Диапазон 10- 20 метров");
    assert_eq!(handler.join_lines(["северо-", "«запад»"], " "), "северо- «запад»");
    assert_eq!(handler.join_lines(["само\u{00AD}", "лёт"], " "), "самолёт");
}

#[test]
fn test_hyphen_after_digit_joins_word() {
    let handler = HyphenationHandler::new();
    assert_eq!(handler.join_lines(["раз в 10-", "летие"], " "), "раз в 10летие");
    let paragraphs = ParagraphSegmenter::new(LineJoin::Newline)
        .segment(&[line("Праздник раз в 10-", 50.0, 700.0), line("летие города", 50.0, 688.0)]);
    assert_eq!(paragraphs, vec!["Праздник раз в 10летие города"]);
}

#[test]
fn test_repair_disabled() {
    let handler = HyphenationHandler::new().with_repair(false);
    assert_eq!(handler.join_lines(["инфор-", "мация"], " "), "инфор- мация");
}

#[test]
fn test_malformed_lines_stay_in_paragraph() {
    let lines = vec![
        line("Начало абзаца", 50.0, 700.0),
        Line::text_only("строка без координат"),
        line("конец абзаца.", 50.0, 300.0),
    ];
    let paragraphs = ParagraphSegmenter::new(LineJoin::Space).segment(&lines);
    assert_eq!(paragraphs, vec!["Начало абзаца строка без координат конец абзаца."]);
}

fn arb_word() -> impl Strategy<Value = String> {
    "[а-яА-Яa-z]{1,10}"
}

fn arb_run() -> impl Strategy<Value = Vec<(Vec<String>, f32, f32)>> {
    // (words, gap before the line, x0)
    prop::collection::vec(
        (prop::collection::vec(arb_word(), 1..6), 0.0f32..30.0, prop::sample::select(vec![50.0f32, 50.0, 80.0])),
        1..20,
    )
}

proptest! {
    #[test]
    fn prop_segmentation_is_lossless(run in arb_run()) {
        let mut y = 800.0f32;
        let mut lines = Vec::new();
        let mut expected = Vec::new();
        for (words, gap, x0) in &run {
            y -= 10.0 + gap;
            lines.push(line(&words.join(" "), *x0, y));
            expected.extend(words.iter().cloned());
        }

        for join in [LineJoin::Space, LineJoin::Newline] {
            let paragraphs = ParagraphSegmenter::new(join).segment(&lines);
            let words: Vec<String> = paragraphs
                .iter()
                .flat_map(|p| p.split_whitespace().map(str::to_string).collect::<Vec<_>>())
                .collect();
            prop_assert_eq!(&words, &expected);
            prop_assert!(paragraphs.len() <= lines.len());
        }
    }
}
