//! Replays a simulated drag session against an in-memory scroll container
//! and logs every scroll change.
//!
//! ```text
//! RUST_LOG=debug cargo run -p example -- --at 300,300 --at 300,10 --frames 20
//! ```

use std::{cell::Cell, rc::Rc};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use dragscroll::{
    DragFlag, MoveEvent, Point, ScrollOptions, ScrollingMonitor, ThrottleEdge,
    strength::{create_horizontal_strength, create_vertical_strength},
    testing::{FakeContainer, FakeEventHost, ManualScheduler},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "example")]
#[command(
    version,
    about = "Replay a drag session against a simulated scroll container",
    long_about = None
)]
struct Cli {
    /// Visible width and height of the container in pixels
    #[arg(long, default_value_t = 600)]
    size: i32,
    /// Width and height of the scrollable content in pixels
    #[arg(long, default_value_t = 2000)]
    content: i32,
    /// Initial scroll offset as whole pixels `left,top`
    #[arg(long, value_parser = parse_offset, default_value = "700,700")]
    start: (i32, i32),
    /// Pointer positions as `x,y`, visited in order
    #[arg(
        long = "at",
        value_parser = parse_point,
        default_values = ["300,300", "300,20", "580,20", "300,300"]
    )]
    path: Vec<Point>,
    /// Frames to run at each pointer position
    #[arg(long, default_value_t = 30)]
    frames: usize,
    /// Edge buffer width in pixels
    #[arg(long, default_value_t = 150.0)]
    buffer: f64,
    /// Pixels per active tick at full strength
    #[arg(long, default_value_t = 30.0)]
    multiplier: f64,
    /// Scroll on every N-th tick
    #[arg(long, default_value_t = 2)]
    stride: u32,
    /// Which edge of the throttle window recomputes strength
    #[arg(long, value_enum, default_value_t = Edge::Trailing)]
    edge: Edge,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Edge {
    Leading,
    Trailing,
    Both,
}

impl From<Edge> for ThrottleEdge {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Leading => ThrottleEdge::Leading,
            Edge::Trailing => ThrottleEdge::Trailing,
            Edge::Both => ThrottleEdge::Both,
        }
    }
}

fn parse_point(value: &str) -> Result<Point, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|err| format!("invalid coordinate `{part}`: {err}"))
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn parse_offset(value: &str) -> Result<(i32, i32), String> {
    let (left, top) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `left,top`, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|err| format!("invalid offset `{part}`: {err}"))
    };
    Ok((parse(left)?, parse(top)?))
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            match tracing_subscriber::EnvFilter::try_new("error,example=info,dragscroll=info") {
                Ok(filter) => filter,
                Err(_) => tracing_subscriber::EnvFilter::new("error"),
            }
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    if cli.size <= 0 || cli.content <= 0 {
        bail!("container and content sizes must be positive");
    }

    let container = FakeContainer::sized(cli.size, cli.size, cli.content, cli.content);
    let (start_left, start_top) = cli.start;
    if start_left < 0 || start_top < 0 {
        bail!("start offset must not be negative");
    }
    container.scroll_to(start_left, start_top);
    let host = FakeEventHost::new();
    let scheduler = ManualScheduler::new();
    let drag = DragFlag::new();

    let changes = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&changes);
    let options = ScrollOptions::default()
        .horizontal_strength(create_horizontal_strength(cli.buffer))
        .vertical_strength(create_vertical_strength(cli.buffer))
        .strength_multiplier(cli.multiplier)
        .frame_stride(cli.stride)
        .throttle_edge(cli.edge.into())
        .on_scroll_change(move |left, top| {
            counter.set(counter.get() + 1);
            info!(left, top, "scroll changed");
        });
    let window = options.throttle_interval;

    let monitor = ScrollingMonitor::builder(container.clone())
        .event_host(host.clone())
        .scheduler(scheduler.clone())
        .drag_source(drag.clone())
        .options(options)
        .build()
        .context("failed to build scrolling monitor")?;
    monitor.start();
    drag.set_dragging(true);

    for point in &cli.path {
        info!(x = point.x, y = point.y, "pointer moved");
        host.dispatch_on_container(MoveEvent::drag_over(*point));
        scheduler.advance(window);
        scheduler.run_frames(cli.frames);

        let (left, top) = container.offset();
        let strength = monitor.strength();
        info!(
            left,
            top,
            strength_x = strength.x,
            strength_y = strength.y,
            scrolling = monitor.is_scrolling(),
            "settled"
        );
    }

    drag.set_dragging(false);
    monitor.stop();

    let (left, top) = container.offset();
    info!(
        left,
        top,
        changes = changes.get(),
        frames = scheduler.frames_run(),
        "replay finished"
    );
    Ok(())
}
