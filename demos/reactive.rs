//! Reactive Example - Signals, dynamic contents and frame ticks
//!
//! This example demonstrates:
//! - A width signal bound to a box prop (layout follows writes)
//! - A dynamic node switching its contents from a signal
//! - A tick callback driven by frames set from the outside
//!
//! Run with: cargo run --example reactive
//! Logs: RUST_LOG=spark_canvas=debug cargo run --example reactive

use std::cell::Cell;
use std::rc::Rc;

use spark_canvas::renderer::RasterSurface;
use spark_canvas::types::{Dimension, Rgba};
use spark_canvas::{
    BoxProps, MountOptions, PropValue, box_primitive, component, create_memo, create_tick,
    dynamic, mount, signal,
};
use tracing_subscriber::EnvFilter;

fn print_row(surface: &RasterSurface, width: u32) {
    let line: String = (0..width)
        .map(|x| match surface.pixel(x, 0) {
            Some(p) if p == Rgba::RED => 'R',
            Some(p) if p == Rgba::BLUE => 'B',
            _ => '.',
        })
        .collect();
    println!("  [{line}]");
}

fn main() -> spark_canvas::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== spark-canvas Reactive Example ===\n");

    let width = 24;
    let surface = RasterSurface::new(width, 1);
    let progress = signal(0.0f64);
    let elapsed = Rc::new(Cell::new(0.0));

    let (bar, clock) = (progress.clone(), elapsed.clone());
    let handle = mount(
        surface.clone(),
        move || {
            let (bar, clock) = (bar.clone(), clock.clone());
            component(move || {
                let clock = clock.clone();
                if let Err(error) = create_tick(move |dt| clock.set(clock.get() + dt)) {
                    tracing::warn!(%error, "tick unavailable");
                }

                let done = {
                    let bar = bar.clone();
                    create_memo(move |_| bar.get() >= 100.0)
                };
                let bar = bar.clone();
                let contents = dynamic(move || {
                    if done.get() {
                        return box_primitive(BoxProps {
                            width: Dimension::Fill.into(),
                            height: 1.into(),
                            fill_style: Some(Rgba::BLUE.into()),
                            ..Default::default()
                        });
                    }
                    let bar = bar.clone();
                    box_primitive(BoxProps {
                        width: PropValue::getter(move || Dimension::Percent(bar.get())),
                        height: 1.into(),
                        fill_style: Some(Rgba::RED.into()),
                        ..Default::default()
                    })
                });

                // Percent widths resolve against this track.
                box_primitive(BoxProps {
                    width: Dimension::Fixed(width as f64).into(),
                    height: 1.into(),
                    children: vec![contents],
                    ..Default::default()
                })
            })
        },
        MountOptions::from_env(),
    )?;

    for frame in 0..6 {
        progress.set(frame as f64 * 25.0)?;
        handle.set_frame(frame, frame as f64 * 16.0)?;
        print!("frame {frame}:");
        print_row(&surface, width);
    }
    println!("\nelapsed: {}ms", elapsed.get());

    handle.unmount();
    println!("\n=== Example Complete ===");
    Ok(())
}
