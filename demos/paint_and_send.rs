//! Paint a pattern and push it to a display.
//!
//! Demonstrates:
//! - Painting a grid with brush levels
//! - Encoding to text and strict decoding back
//! - Concurrent sends sharing one connection attempt
//! - Automation actions and their JSON outcomes
//! - Releasing the session
//!
//! Runs against the in-process loopback service.
//!
//! Usage:
//!   cargo run --example paint_and_send
//!   cargo run --example paint_and_send -- --debug
//!   cargo run --example paint_and_send -- --refuse

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use glyph_matrix::{
    ClearPatternAction, ConnectBehavior, ConnectionManager, ExportPatternAction, GRID_SIZE, Grid,
    HostAction, Level, LoopbackService, Result, UpdatePatternAction, decode_strict,
};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    debug: bool,
    refuse: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self {
            debug: args.iter().any(|a| a == "--debug"),
            refuse: args.iter().any(|a| a == "--refuse"),
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "glyph_matrix=debug"
    } else {
        "glyph_matrix=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== Paint and Send ===\n");

    let behavior = if args.refuse {
        ConnectBehavior::Refuse
    } else {
        ConnectBehavior::Accept
    };
    let service = LoopbackService::new()
        .with_connect_delay(Duration::from_millis(200))
        .with_behavior(behavior);

    let manager = ConnectionManager::builder()
        .service(service.clone())
        .connect_timeout(Duration::from_secs(2))
        .build()?;

    // ========================================================================
    // Paint
    // ========================================================================

    println!("[Paint] Drawing a diagonal cross...");
    let brush = Level::MAX.to_brightness();
    let mut grid = Grid::empty();
    for i in 0..GRID_SIZE {
        grid.set(i * GRID_SIZE + i, brush);
        grid.set(i * GRID_SIZE + (GRID_SIZE - 1 - i), brush);
    }
    println!("        ✓ {} pixels lit\n", grid.lit_count());

    let text = grid.encode(true);
    let decoded = decode_strict(&text)?;
    assert_eq!(decoded, grid);
    println!("[Codec] Encoded pattern:\n{text}\n");

    // ========================================================================
    // Send
    // ========================================================================

    println!("[Send] Three concurrent sends...");
    let filled = Grid::filled(brush);
    let (a, b, c) = tokio::join!(
        manager.send(&grid),
        manager.send(&grid),
        manager.send(&filled)
    );
    for (i, result) in [a, b, c].into_iter().enumerate() {
        match result {
            Ok(()) => println!("        ✓ send {i} ok"),
            Err(e) => println!("        ✗ send {i} failed: {e}"),
        }
    }
    println!("        init calls: {}\n", service.init_calls());

    // ========================================================================
    // Automation Actions
    // ========================================================================

    println!("[Automation] Running host actions...");
    let actions: Vec<Box<dyn HostAction>> = vec![
        Box::new(UpdatePatternAction::new(grid.encode(false))),
        Box::new(UpdatePatternAction::new("0F0")),
        Box::new(UpdatePatternAction::default()),
        Box::new(ClearPatternAction),
    ];
    for action in &actions {
        let outcome = action.run(&manager).await;
        println!("        {} -> {}", action.summary(), outcome.to_json()?);
    }

    let export = ExportPatternAction::default().run(&grid);
    println!("        export -> {} chars\n", export.output.map_or(0, |o| o.len()));

    // ========================================================================
    // Release
    // ========================================================================

    manager.release().await?;
    println!("[Release] State: {}", manager.state());

    Ok(())
}
