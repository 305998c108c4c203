//! Example: Page objects with bound element descriptors
//!
//! Demonstrates: declaring a page's fields once and driving a whole
//! login flow through named reads and writes.
//!
//! Run with: `cargo run --example login_flow -p pagina`

use pagina::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() -> PaginaResult<()> {
    println!("=== Login Flow Example ===\n");

    // 1. Stand up a fake page the way a browser would render it
    println!("1. Registering page elements on the mock driver...");
    let driver = Arc::new(MockDriver::new());
    driver.register(Locator::id("user"), MockElement::new("input"));
    driver.register(Locator::id("pass"), MockElement::new("input"));
    driver.register(
        Locator::id("remember"),
        MockElement::new("input").with_toggle_on_click(),
    );
    driver.register(Locator::id("go"), MockElement::new("button"));
    driver.set_title("Dashboard");
    println!("   4 elements registered");

    // 2. Declare the page: URL template, base, timeout, fields
    println!("\n2. Building the page object...");
    let login = PageBuilder::new("login")
        .base_url("https://app.example.test/")
        .timeout(Duration::from_millis(250))
        .field("username", ElementSpec::text_box(Locator::id("user")))
        .field("password", ElementSpec::text_box(Locator::id("pass")))
        .field("remember", ElementSpec::checkbox(Locator::id("remember")))
        .field("submit", ElementSpec::button(Locator::id("go")))
        .build(Arc::clone(&driver))?;

    println!("   URL: {}", login.url());
    println!("   Fields: {:?}", login.field_names());

    // 3. Field declarations are inspectable
    println!("\n3. Inspecting declared fields...");
    for name in login.field_names() {
        if let Some(spec) = login.field(name) {
            println!("   {name} -> {spec}");
        }
    }

    // 4. Drive the flow through the page surface
    println!("\n4. Running the flow...");
    login.open()?;
    login.set("username", "alice")?;
    login.set("password", "hunter2")?;
    login.set("remember", true)?;
    login.element("submit")?.click()?;
    println!("   Navigated to: {:?}", driver.visited());
    println!("   Username now reads: {:?}", login.text("username")?);
    println!("   Remember me: {}", login.selected("remember")?);

    // 5. The page's wait engine confirms the outcome
    println!("\n5. Waiting for the post-login title...");
    login.wait().until.title_is("Dashboard")?;
    println!("   Title matched");

    // 6. URL templates with placeholders
    println!("\n6. URL templates...");
    let profile = PageBuilder::new("/users/{user_id}")
        .base_url("https://app.example.test/")
        .url_arg("user_id", 42)
        .build(Arc::clone(&driver))?;
    println!("   /users/{{user_id}} + user_id=42 -> {}", profile.url());

    // 7. Writes respect the field kind
    println!("\n7. Kind-checked writes...");
    match login.set("submit", "anything") {
        Err(e) => println!("   Writing a button fails: {e}"),
        Ok(()) => println!("   unexpected"),
    }
    println!(
        "   submit is declared as: {}",
        login
            .field("submit")
            .map_or("?", |spec| spec.kind().as_str())
    );
    assert_eq!(
        login.field("submit").map(ElementSpec::kind),
        Some(ElementKind::Button)
    );

    println!("\nLogin flow example completed");
    Ok(())
}
