//! Printing lab state.

use anyhow::Result;
use circuitlab::{CircuitLab, LabEvent, PassReport, Point};
use circuitlab_core::units::format_quantity;
use serde::Serialize;

/// One placed component as printed.
#[derive(Debug, Serialize)]
pub struct ComponentRow {
    pub id: u32,
    pub name: String,
    pub kind: String,
    pub start: Point,
    pub end: Point,
    pub closed: bool,
    pub active: bool,
    pub short_circuit: bool,
    pub forward: bool,
    pub voltage: f64,
    pub current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Everything printed after a run.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub report: Option<PassReport>,
    pub components: Vec<ComponentRow>,
    pub events: Vec<LabEvent>,
}

impl Summary {
    /// Snapshot the lab, draining its pending events.
    pub fn collect(lab: &mut CircuitLab) -> Self {
        let components = lab
            .board()
            .components()
            .map(|placed| {
                let component = placed.component();
                let state = component.state();
                ComponentRow {
                    id: placed.id().as_u32(),
                    name: component.name().to_string(),
                    kind: component.kind().to_string(),
                    start: placed.start(),
                    end: placed.end(),
                    closed: component.is_closed(),
                    active: state.active,
                    short_circuit: state.short_circuit,
                    forward: state.forward,
                    voltage: state.voltage,
                    current: state.current,
                    label: lab.label(placed.id()),
                }
            })
            .collect();
        Self {
            report: lab.last_report().cloned(),
            components,
            events: lab.take_events(),
        }
    }
}

pub fn print_json(summary: &Summary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

pub fn print_table(summary: &Summary) {
    if let Some(report) = &summary.report {
        println!(
            "Pass {}: {} active circuit(s), {} short(s), {} failed",
            report.generation,
            report.active_circuits,
            report.shorted.len(),
            report.failed.len()
        );
        println!();
    }

    println!(
        "{:>4}  {:<14} {:<10} {:<17} {:<9} {:>10} {:>10}  {}",
        "ID", "Name", "Kind", "Span", "State", "Voltage", "Current", "Label"
    );
    println!("{}", "-".repeat(86));
    for row in &summary.components {
        let state = if row.short_circuit {
            "SHORT"
        } else if row.active {
            "active"
        } else if !row.closed {
            "open"
        } else {
            "-"
        };
        let span = format!("{} -> {}", row.start, row.end);
        println!(
            "{:>4}  {:<14} {:<10} {:<17} {:<9} {:>10} {:>10}  {}",
            row.id,
            row.name,
            row.kind,
            span,
            state,
            format_quantity(row.voltage, "V"),
            format_quantity(row.current, "A"),
            row.label.as_deref().unwrap_or("")
        );
    }

    if !summary.events.is_empty() {
        println!();
        println!("Events:");
        for event in &summary.events {
            match event {
                LabEvent::CircuitCompleted { battery } => {
                    println!("  circuit completed (battery {})", battery)
                }
                LabEvent::ShortCircuit { battery } => {
                    println!("  short circuit (battery {})", battery)
                }
                LabEvent::SwitchToggled { id, closed } => {
                    println!("  component {} {}", id, if *closed { "closed" } else { "opened" })
                }
            }
        }
    }
}
