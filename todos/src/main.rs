//! Simple CLI demo for the todo store.
//!
//! Seeds a session, subscribes an observer that reports the live counts,
//! walks through the operation set, and finishes with a JSON snapshot of
//! the final state.

use std::sync::Arc;
use todos::{seed_state, FilterMode, TodoEnvironment, TodoStore};
use unistore_core::environment::{RandomIds, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_list(store: &TodoStore) {
    for todo in store.filtered_todos() {
        let status = if todo.completed { "✓" } else { " " };
        println!("  [{}] {}", status, todo.text);
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todos=debug,unistore_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Todo Store Example ===\n");

    // One explicitly constructed store for the whole session
    let env = TodoEnvironment::new(Arc::new(SystemClock), Arc::new(RandomIds));
    let store = TodoStore::with_state(seed_state(&env), env);

    // Observer: report live counts after every change
    let token = store.subscribe(|state| {
        let stats = state.stats();
        println!(
            "  -> observer: {} total, {} active, {} completed",
            stats.total, stats.active, stats.completed
        );
    });

    println!("Seeded list:");
    print_list(&store);

    println!("\n>>> add(\"Review the release notes\")");
    let new_id = store.add("Review the release notes");

    println!("\n>>> add(\"   \") — rejected, no notification");
    let rejected = store.add("   ");
    println!("  accepted: {}", rejected.is_some());

    if let Some(id) = new_id {
        println!("\n>>> toggle(the new entry)");
        store.toggle(&id);
    }

    println!("\n>>> set_filter(completed)");
    store.set_filter(FilterMode::Completed);
    println!("Completed view:");
    print_list(&store);

    println!("\n>>> clear_completed()");
    store.clear_completed();

    println!("\n>>> set_filter(all)");
    store.set_filter(FilterMode::All);
    println!("Remaining list:");
    print_list(&store);

    store.unsubscribe(token);

    match serde_json::to_string_pretty(&store.snapshot()) {
        Ok(json) => println!("\nFinal state snapshot:\n{json}"),
        Err(error) => eprintln!("snapshot serialization failed: {error}"),
    }

    println!("\n=== Demo Complete ===");
}
