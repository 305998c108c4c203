//! Wait Conditions Example
//!
//! Demonstrates the explicit-wait engine:
//! - WaitOptions (timeout, poll interval, failure message)
//! - until / until_not condition namespaces
//! - per-call overrides, typed and through keyword bags
//! - polling across threads
//!
//! Run with: `cargo run --example wait_conditions -p pagina`

use pagina::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    println!("=== Wait Conditions Example ===\n");

    demo_options();
    demo_until();
    demo_until_not();
    demo_overrides();
    demo_background_polling();

    println!("\n=== Wait Conditions Example Complete ===");
}

fn demo_options() {
    println!("--- Demo 1: WaitOptions ---\n");

    let defaults = WaitOptions::default();
    println!("Defaults:");
    println!("  timeout_ms: {}", defaults.timeout_ms);
    println!("  poll_interval_ms: {}", defaults.poll_interval_ms);

    let custom = WaitOptions::new()
        .with_timeout(2_000)
        .with_poll_interval(50)
        .with_message("page never settled");
    println!("\nBuilder form:");
    println!("  timeout(): {:?}", custom.timeout());
    println!("  poll_interval(): {:?}", custom.poll_interval());
    println!("  message: {:?}", custom.message);
    println!();
}

fn demo_until() {
    println!("--- Demo 2: until ---\n");

    let driver = Arc::new(MockDriver::new());
    driver.set_title("Inbox (3)");
    driver.register(Locator::id("refresh"), MockElement::new("button"));

    let wait = Wait::new(Arc::clone(&driver), Duration::from_millis(200));

    println!(
        "title_contains(\"Inbox\"): {}",
        outcome(wait.until.title_contains("Inbox").is_ok())
    );
    println!(
        "element_to_be_clickable(id=refresh): {}",
        outcome(wait.until.element_to_be_clickable(Locator::id("refresh")).is_ok())
    );

    // a condition that never holds carries its description into the error
    if let Err(e) = wait.until.title_is("Archive") {
        println!("title_is(\"Archive\") -> {e}");
    }
    println!();
}

fn demo_until_not() {
    println!("--- Demo 3: until_not ---\n");

    let driver = Arc::new(MockDriver::new());
    let wait = Wait::new(Arc::clone(&driver), Duration::from_millis(200));

    // nothing matches, so the falsy-ward wait returns immediately
    println!(
        "presence_of_element_located(id=spinner) cleared: {}",
        outcome(
            wait.until_not
                .presence_of_element_located(Locator::id("spinner"))
                .is_ok()
        )
    );

    let spinner = MockElement::new("div");
    driver.register(Locator::id("spinner"), spinner.clone());
    spinner.set_displayed(false);
    println!(
        "visibility_of_element_located(id=spinner) cleared: {}",
        outcome(
            wait.until_not
                .visibility_of_element_located(Locator::id("spinner"))
                .is_ok()
        )
    );
    println!();
}

fn demo_overrides() {
    println!("--- Demo 4: Per-call overrides ---\n");

    let driver = Arc::new(MockDriver::new());
    let wait = Wait::new(Arc::clone(&driver), Duration::from_secs(10));

    // typed builder overrides
    let result = wait
        .until
        .timeout(Duration::from_millis(30))
        .poll_interval(Duration::from_millis(5))
        .message("login button never appeared")
        .element_to_be_clickable(Locator::id("login"));
    if let Err(e) = result {
        println!("typed override -> {e}");
    }

    // the same overrides carried in a keyword bag next to the locator
    let bag = Keywords::new()
        .arg("css", "#login")
        .arg("timeout", 0.03)
        .arg("message", "login button never appeared");
    if let Err(e) = wait.until.visibility_of_element_located(bag) {
        println!("keyword override -> {e}");
    }
    println!();
}

fn demo_background_polling() {
    println!("--- Demo 5: Polling across threads ---\n");

    let driver = Arc::new(MockDriver::new());
    let banner = MockElement::new("div").with_displayed(false);
    driver.register(Locator::id("banner"), banner.clone());

    // another thread reveals the banner while the main thread polls
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(40));
        banner.set_displayed(true);
    });

    let options = WaitOptions::new().with_timeout(500).with_poll_interval(10);
    let wait = Wait::with_options(Arc::clone(&driver), options);
    let found = wait
        .until
        .visibility_of_element_located(Locator::id("banner"));
    println!("banner became visible: {}", outcome(found.is_ok()));
    if handle.join().is_err() {
        println!("background thread panicked");
    }
    println!();
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "failed"
    }
}
