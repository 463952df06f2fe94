use serde_json::json;
use std::collections::BTreeMap;

use castsense::frames::{
    cast_image_url, frame_html, frame_image_url, hours_lines, stats_lines, tier_lines, Screen,
    ScreenContent, CONTINUE_LABEL,
};
use castsense::{normalize_grid, TierStanding};

#[test]
fn screens_form_a_single_forward_chain() {
    let expected = [
        Screen::Home,
        Screen::ThirtyDayStats,
        Screen::ActiveHours,
        Screen::ActiveChannels,
        Screen::FollowerTiers,
        Screen::TopCast,
        Screen::TrendingWords,
    ];

    let mut walked = vec![Screen::Home];
    let mut current = Screen::Home;
    while let Some(next) = current.next() {
        walked.push(next);
        current = next;
    }

    assert_eq!(walked, expected);
    assert_eq!(Screen::TrendingWords.next(), None);
}

#[test]
fn screen_paths_round_trip() {
    for screen in [
        Screen::ThirtyDayStats,
        Screen::ActiveHours,
        Screen::ActiveChannels,
        Screen::FollowerTiers,
        Screen::TopCast,
        Screen::TrendingWords,
    ] {
        assert_eq!(Screen::from_path(screen.path()), Some(screen));
    }
    assert_eq!(Screen::from_path("nope"), None);
}

#[test]
fn frame_html_advertises_one_forward_action() {
    let html = frame_html(
        "Stats",
        "https://img.example/render?title=Stats",
        Some("https://app.example/frames/active-hours"),
    );

    assert!(html.contains("<meta property=\"fc:frame\" content=\"vNext\"/>"));
    assert!(html.contains("fc:frame:image"));
    assert!(html.contains(&format!(
        "<meta property=\"fc:frame:button:1\" content=\"{}\"/>",
        CONTINUE_LABEL
    )));
    assert!(html.contains("https://app.example/frames/active-hours"));
}

#[test]
fn terminal_frame_has_no_button() {
    let html = frame_html("Words", "https://img.example/render", None);

    assert!(html.contains("fc:frame:image"));
    assert!(!html.contains("fc:frame:button"));
    assert!(!html.contains("fc:frame:post_url"));
}

#[test]
fn frame_html_escapes_attribute_values() {
    let html = frame_html("a \"b\" & c", "https://img.example/render?x=1&y=2", None);
    assert!(html.contains("a &quot;b&quot; &amp; c"));
    assert!(html.contains("x=1&amp;y=2"));
}

#[test]
fn stats_lines_show_signed_percentage_change() {
    let row = json!({
        "current_period_casts": 120,
        "casts_percentage_change": -12.4,
        "current_period_replies": 48,
        "replies_percentage_change": 3.0,
        "current_period_followers": 900,
        "followers_percentage_change": 0.0,
        "current_period_likes": 310,
        "likes_percentage_change": 25.6,
        "current_period_recasts": 12,
        "recasts_percentage_change": -3.0,
        "current_period_mentions": 7,
        "mentions_percentage_change": 1.0
    });
    let lines = stats_lines(row.as_object().unwrap());

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Casts 120 ↓12%");
    assert_eq!(lines[1], "Replies 48 ↑3%");
    assert_eq!(lines[3], "Likes 310 ↑26%");
}

#[test]
fn hours_lines_follow_week_order_and_name_peaks() {
    let row = json!({
        "sunday_hourly_counts": {"8": 4},
        "monday_hourly_counts": {"18": 42, "9": 10}
    });
    let grid = normalize_grid(row.as_object().unwrap());
    let lines = hours_lines(&grid);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Mon busiest at 18:00 (42)");
    assert_eq!(lines[1], "Sun busiest at 08:00 (4)");
}

#[test]
fn hours_lines_skip_absent_days() {
    let grid: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    assert!(hours_lines(&grid).is_empty());
}

#[test]
fn tier_lines_show_percentage_and_count() {
    let tiers = vec![
        TierStanding {
            name: "🥇 influencer".to_string(),
            count: 34,
            percentage: 60.0,
        },
        TierStanding {
            name: "🤖 npc".to_string(),
            count: 10,
            percentage: 12.5,
        },
    ];

    let lines = tier_lines(&tiers);
    assert_eq!(lines[0], "🥇 influencer: 60% (34)");
    assert_eq!(lines[1], "🤖 npc: 12.5% (10)");
}

#[test]
fn image_urls_encode_screen_text() {
    let content = ScreenContent {
        title: "Trending words".to_string(),
        lines: vec!["gm world".to_string(), "frames & casts".to_string()],
    };
    let url = frame_image_url("https://img.example/render/", &content);

    assert!(url.starts_with("https://img.example/render?"));
    assert!(url.contains("title=Trending%20words"));
    assert!(url.contains("gm%20world%0Aframes%20%26%20casts"));
}

#[test]
fn cast_image_url_points_at_the_hash() {
    let url = cast_image_url("https://client.warpcast.com/v2/cast-image", "0xabc123");
    assert_eq!(
        url,
        "https://client.warpcast.com/v2/cast-image?castHash=0xabc123"
    );
}

#[test]
fn placeholder_content_prompts_for_a_cast() {
    let content = ScreenContent::placeholder(Screen::ThirtyDayStats);
    assert_eq!(content.title, Screen::ThirtyDayStats.title());
    assert_eq!(content.lines.len(), 1);
}
