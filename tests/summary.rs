use castsense::neynar::WeightedReply;
use castsense::openai::{build_compress_prompt, build_summary_prompt, clip_to_budget};

#[test]
fn clip_leaves_short_text_untouched() {
    assert_eq!(clip_to_budget("ai, memes, art", 80), "ai, memes, art");
}

#[test]
fn clip_never_exceeds_budget() {
    let long = "a".repeat(500);
    for budget in [0, 1, 2, 3, 4, 10, 30, 80] {
        let clipped = clip_to_budget(&long, budget);
        assert!(
            clipped.chars().count() <= budget,
            "budget {} produced {} chars",
            budget,
            clipped.chars().count()
        );
    }
}

#[test]
fn clip_marks_truncation_with_ellipsis() {
    let clipped = clip_to_budget(&"word ".repeat(40), 30);
    assert_eq!(clipped.chars().count(), 30);
    assert!(clipped.ends_with("..."));
}

#[test]
fn clip_counts_characters_not_bytes() {
    let clipped = clip_to_budget(&"é".repeat(100), 10);
    assert_eq!(clipped.chars().count(), 10);
}

#[test]
fn summary_prompt_embeds_post_and_replies() {
    let replies = vec![
        WeightedReply {
            text: "degen season is back".to_string(),
            num_likes: 12,
        },
        WeightedReply {
            text: "love the onchain art angle".to_string(),
            num_likes: 3,
        },
    ];
    let replies_json = serde_json::to_string(&replies).unwrap();
    let prompt = build_summary_prompt("gm, shipped a new frame today", &replies_json, 80);

    assert!(prompt.contains("gm, shipped a new frame today"));
    assert!(prompt.contains("degen season is back"));
    assert!(prompt.contains("\"num_likes\":12"));
    assert!(prompt.contains("$DEGEN"));
    assert!(prompt.contains("80 CHARACTERS"));
}

#[test]
fn summary_prompt_handles_zero_replies() {
    let prompt = build_summary_prompt("a lonely cast", "[]", 80);
    assert!(prompt.contains("a lonely cast"));
    assert!(prompt.contains("[]"));
}

#[test]
fn compress_prompt_carries_budget_and_input() {
    let prompt = build_compress_prompt("alpha, beta, gamma, delta", 80);
    assert!(prompt.contains("under 80 characters"));
    assert!(prompt.contains("alpha, beta, gamma, delta"));
}
