//! Small demo: build a page, search it, step through the matches.
//!
//! Run with `RUST_LOG=debug` to watch the scan and timers.

use accessible_find::{Direction, Document, FindInPage, Rect, Settings};

fn main() -> accessible_find::Result<()> {
    env_logger::init();

    let mut doc = Document::new();
    let body = doc.body();
    let paragraphs = [
        "The quick brown fox jumps over the lazy dog",
        "A fox den was found near the river bank",
        "No animals in this paragraph at all",
        "Finally the arctic fox appears once more",
    ];
    for (i, text) in paragraphs.iter().enumerate() {
        let p = doc.create_element("p");
        doc.set_rect(p, Rect::new(0.0, 40.0 * i as f32, 600.0, 30.0));
        let t = doc.create_text(text);
        doc.append_child(p, t);
        doc.append_child(body, p);
    }

    let mut find = FindInPage::new(doc);
    let settings = Settings::default().with_num_surrounding_words(2);
    let interval = settings.blink_interval;

    let mut now = 0;
    let found = find.perform_search("fox", settings, now)?;
    println!("found {} matches, starting at {:?}", found.count, found.current_index);

    // Let the all-matches blink play out
    for _ in 0..6 {
        now += interval;
        find.tick(now);
    }

    for _ in 0..found.count {
        let nav = find.navigate(Direction::Next, now)?;
        println!("-> match {:?} of {}", nav.current_index, nav.count);
        now += interval;
        find.tick(now);
    }

    find.cancel_and_cleanup();
    println!("cleared; page text intact: {:?}", find.body_text().unwrap_or_default());
    Ok(())
}
