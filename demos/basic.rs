//! Basic Example - Boxes in flow layout
//!
//! This example demonstrates basic usage of the spark-canvas primitives:
//! - Mounting a tree onto an in-memory raster surface
//! - Block and inline-block boxes with fixed, percent and fill sizes
//! - Reading computed rects through refs
//!
//! Run with: cargo run --example basic
//! Logs: RUST_LOG=spark_canvas=trace cargo run --example basic

use spark_canvas::renderer::RasterSurface;
use spark_canvas::types::{Dimension, Display, Edges, Rgba};
use spark_canvas::{BoxProps, MountOptions, box_primitive, create_ref, mount};
use tracing_subscriber::EnvFilter;

/// Print the surface with one character per pixel.
fn print_surface(surface: &RasterSurface, width: u32, height: u32) {
    for y in 0..height {
        let line: String = (0..width)
            .map(|x| match surface.pixel(x, y) {
                Some(p) if p == Rgba::RED => 'R',
                Some(p) if p == Rgba::GREEN => 'G',
                Some(p) if p == Rgba::BLUE => 'B',
                Some(p) if p == Rgba::GRAY => '#',
                Some(p) if p.is_transparent() => '.',
                _ => '?',
            })
            .collect();
        println!("  {line}");
    }
}

fn main() -> spark_canvas::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== spark-canvas Basic Example ===\n");

    let (width, height) = (32, 16);
    let surface = RasterSurface::new(width, height);
    let sidebar = create_ref();
    let header = create_ref();

    let (sidebar_ref, header_ref) = (sidebar.clone(), header.clone());
    let handle = mount(
        surface.clone(),
        move || {
            box_primitive(BoxProps {
                width: Dimension::Fixed(width as f64).into(),
                height: Dimension::Fixed(height as f64).into(),
                padding: Edges::all(1.0).into(),
                fill_style: Some(Rgba::GRAY.into()),
                children: vec![
                    box_primitive(BoxProps {
                        width: Dimension::Fill.into(),
                        height: 3.into(),
                        fill_style: Some(Rgba::RED.into()),
                        node_ref: Some(header_ref.clone()),
                        ..Default::default()
                    }),
                    box_primitive(BoxProps {
                        display: Display::InlineBlock.into(),
                        width: Dimension::Percent(25.0).into(),
                        height: Dimension::Fill.into(),
                        margin: Edges::new(1.0, 1.0, 0.0, 0.0).into(),
                        fill_style: Some(Rgba::GREEN.into()),
                        node_ref: Some(sidebar_ref.clone()),
                        ..Default::default()
                    }),
                    box_primitive(BoxProps {
                        display: Display::InlineBlock.into(),
                        width: Dimension::Fill.into(),
                        height: Dimension::Fill.into(),
                        margin: Edges::new(1.0, 0.0, 0.0, 0.0).into(),
                        fill_style: Some(Rgba::BLUE.into()),
                        ..Default::default()
                    }),
                ],
                ..Default::default()
            })
        },
        MountOptions::from_env(),
    )?;

    print_surface(&surface, width, height);

    println!("\nComputed rects:");
    if let Some(rects) = header.get().and_then(|h| h.rects()) {
        println!("  header:  {:?}", rects.outer);
    }
    if let Some(rects) = sidebar.get().and_then(|h| h.rects()) {
        println!("  sidebar: {:?} (client {:?})", rects.outer, rects.client);
    }

    handle.unmount();
    println!("\n=== Example Complete ===");
    Ok(())
}
