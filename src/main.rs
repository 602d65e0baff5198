//! # Pagewright CLI
//!
//! Usage:
//!   pagewright template.json data.json -o pages.json
//!   pagewright template.json < data.json
//!   pagewright template.json data.json --font NotoSans.ttf
//!   pagewright template.json data.json --fixed-heights
//!   pagewright template.json data.json --config layout.json
//!   pagewright --example > template.json
//!   pagewright --example-data > data.json
//!
//! Set `RUST_LOG=pagewright=debug` to see pagination decisions.

use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, IsTerminal, Read};

use pagewright::font::FontMetrics;
use pagewright::{
    BusinessData, LayoutConfig, LayoutEngine, Measurer, PrintTemplate, TextMeasurer, Unmeasured,
};

#[derive(Debug, Default)]
struct Args {
    template_path: Option<String>,
    data_path: Option<String>,
    output_path: Option<String>,
    font_path: Option<String>,
    config_path: Option<String>,
    fixed_heights: bool,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        let arg = arg.as_str();
        let mut value_of = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", arg))
        };
        match arg {
            "-o" | "--output" => args.output_path = Some(value_of()?),
            "--font" => args.font_path = Some(value_of()?),
            "--config" => args.config_path = Some(value_of()?),
            "--fixed-heights" => args.fixed_heights = true,
            flag if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
            path if args.template_path.is_none() => args.template_path = Some(path.to_string()),
            path if args.data_path.is_none() => args.data_path = Some(path.to_string()),
            extra => return Err(format!("unexpected argument '{}'", extra)),
        }
    }
    Ok(args)
}

fn main() {
    env_logger::init();

    let raw: Vec<String> = env::args().skip(1).collect();

    if raw.iter().any(|a| a == "--example") {
        print!("{}", EXAMPLE_TEMPLATE);
        return;
    }
    if raw.iter().any(|a| a == "--example-data") {
        print!("{}", example_data_json());
        return;
    }

    if let Err(e) = run(&raw) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(raw: &[String]) -> Result<(), Box<dyn Error>> {
    let args = parse_args(raw)?;
    let template_path = args
        .template_path
        .as_deref()
        .ok_or("usage: pagewright <template.json> [data.json] [-o pages.json]")?;

    let template: PrintTemplate = serde_json::from_str(&fs::read_to_string(template_path)?)
        .map_err(pagewright::LayoutError::from)?;
    let data: BusinessData = serde_json::from_str(&read_data(args.data_path.as_deref())?)
        .map_err(pagewright::LayoutError::from)?;
    let config: LayoutConfig = match &args.config_path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)
            .map_err(pagewright::LayoutError::from)?,
        None => LayoutConfig::default(),
    };

    let mut measurer: Box<dyn Measurer> = if args.fixed_heights {
        Box::new(Unmeasured)
    } else {
        let metrics = match &args.font_path {
            Some(path) => FontMetrics::from_font_data(&fs::read(path)?)?,
            None => FontMetrics::from_entries(&template.fonts)?,
        };
        Box::new(TextMeasurer::new(metrics))
    };

    let pages = LayoutEngine::new(&template, &data)?
        .with_config(config)
        .compute_pages(measurer.as_mut());
    let json = serde_json::to_string_pretty(&pages)?;

    match &args.output_path {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("✓ Wrote {} page(s) to {}", pages.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Data comes from the given file, else stdin when piped, else is empty.
fn read_data(path: Option<&str>) -> io::Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok("{}".to_string());
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        buf = "{}".to_string();
    }
    Ok(buf)
}

fn example_data_json() -> String {
    let lines: Vec<serde_json::Value> = (1..=60)
        .map(|i| {
            serde_json::json!({
                "sku": format!("SKU-{:04}", i),
                "name": if i % 7 == 0 {
                    format!("Assorted hardware kit #{i} with mounting brackets, anchors and a printed installation guide")
                } else {
                    format!("Item {i}")
                },
                "qty": i % 5 + 1,
                "warehouse": if i % 3 == 0 { "North" } else { "South" },
            })
        })
        .collect();
    let data = serde_json::json!({
        "orderNo": "SO-2026-0417",
        "customer": "Widget Industries",
        "lines": lines,
    });
    serde_json::to_string_pretty(&data).unwrap_or_default()
}

const EXAMPLE_TEMPLATE: &str = r##"{
  "paper": {
    "width": 210,
    "height": 297,
    "orientation": "portrait",
    "margins": { "top": 10, "right": 10, "bottom": 10, "left": 10 }
  },
  "headerDisplay": "firstPageOnly",
  "footerDisplay": "lastPageOnly",
  "elements": [
    { "id": "title", "type": "text", "content": "Sales Order", "x": 10, "y": 10, "width": 80, "height": 10,
      "style": { "fontSize": 20, "fontWeight": "bold" } },
    { "id": "order-no", "type": "text", "dataKey": "orderNo", "x": 140, "y": 10, "width": 60, "height": 6 },
    { "id": "customer", "type": "text", "dataKey": "customer", "x": 10, "y": 22, "width": 120, "height": 6 },
    { "id": "order-qr", "type": "qrcode", "dataKey": "orderNo", "x": 180, "y": 18, "width": 20, "height": 20 },
    {
      "id": "lines", "type": "table", "x": 10, "y": 42, "width": 190, "height": 200,
      "groupBy": "warehouse",
      "header": {
        "repeat": "all",
        "rows": [ { "height": 8, "cells": [
          { "width": 40, "content": [ { "id": "h-sku", "type": "text", "content": "SKU" } ] },
          { "width": 120, "content": [ { "id": "h-name", "type": "text", "content": "Description" } ] },
          { "width": 30, "content": [ { "id": "h-qty", "type": "text", "content": "Qty" } ] }
        ] } ]
      },
      "body": {
        "dataKey": "lines",
        "rowTemplate": { "height": 7, "heightMode": "auto", "cells": [
          { "width": 40, "content": [ { "id": "b-sku", "type": "text", "dataKey": "sku" } ] },
          { "width": 120, "content": [ { "id": "b-name", "type": "text", "dataKey": "name" } ] },
          { "width": 30, "content": [ { "id": "b-qty", "type": "text", "dataKey": "qty" } ] }
        ] },
        "groupRowTemplate": { "height": 7, "cells": [
          { "width": 190, "colSpan": 3, "content": [ { "id": "g-name", "type": "text", "dataKey": "groupName" } ] }
        ] }
      },
      "footer": {
        "repeat": "last",
        "position": "follow",
        "rows": [ { "height": 8, "cells": [
          { "width": 190, "content": [ { "id": "f-note", "type": "text", "content": "End of order" } ] }
        ] } ]
      }
    },
    { "id": "signature", "type": "line", "x": 130, "y": 270, "x2": 195, "y2": 270, "width": 65, "height": 0 },
    { "id": "pager", "type": "pageInfo", "format": "Page {pageNumber} of {totalPages}", "x": 170, "y": 280, "width": 30, "height": 6 }
  ]
}
"##;
