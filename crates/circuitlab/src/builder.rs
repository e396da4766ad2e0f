//! Translation of a discovered circuit into a solver netlist.
//!
//! Each member becomes a zero-volt sense source in series with its own
//! element, both laid out in traversal direction:
//!
//! ```text
//! battery (first)   start --V{dev}-- 0 --{dev}-- end
//! battery (later)   start --V{dev}-- m{id} --{dev}-- end
//! resistor          start --V{dev}-- m{id} --{dev}-- end
//! conductor         start --V{dev}-- m{id} =={dev}== end
//! ```

use circuitlab_core::{GROUND_LABEL, Netlist};
use circuitlab_devices::{Resistor, TransmissionLine, VoltageSource};

use crate::board::{Board, PlacedComponent};
use crate::component::{ComponentId, ComponentKind};
use crate::discovery::{CircuitTrace, Member};
use crate::error::{Error, Result};

/// Where to read a member's voltage and current in the solved circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub id: ComponentId,
    /// Battery: directed end. Anything else: directed start.
    pub voltage_node: String,
    /// The member's sense source.
    pub current_source: String,
}

/// A netlist for one battery's circuit plus its probes.
#[derive(Debug)]
pub struct BuiltCircuit {
    pub battery: ComponentId,
    pub netlist: Netlist,
    pub probes: Vec<Probe>,
    /// Members omitted because their parameters could not be stamped.
    pub skipped: Vec<ComponentId>,
}

/// Solver device name of a placed component.
pub fn device_name(placed: &PlacedComponent) -> String {
    format!("{}{}", placed.component().kind().device_prefix(), placed.id())
}

/// Name of the zero-volt source that senses a component's current.
pub fn sense_name(placed: &PlacedComponent) -> String {
    format!("V{}", device_name(placed))
}

fn check_parameters(name: &str, kind: ComponentKind) -> Result<()> {
    let invalid = |value: f64| Error::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    };
    match kind {
        ComponentKind::Battery { emf } if !emf.is_finite() => Err(invalid(emf)),
        ComponentKind::Resistor { resistance } if !(resistance.is_finite() && resistance > 0.0) => {
            Err(invalid(resistance))
        }
        _ => Ok(()),
    }
}

/// Build the netlist for a traced circuit.
///
/// A member whose parameters are invalid or which is no longer on the board
/// is logged and left out; the rest of the circuit is still built.
pub fn build_circuit(board: &Board, trace: &CircuitTrace) -> BuiltCircuit {
    let title = board
        .component(trace.battery)
        .map(|placed| format!("circuit {}", device_name(placed)))
        .unwrap_or_else(|| format!("circuit {}", trace.battery));

    let mut built = BuiltCircuit {
        battery: trace.battery,
        netlist: Netlist::with_title(title),
        probes: Vec::with_capacity(trace.members.len()),
        skipped: Vec::new(),
    };

    for member in &trace.members {
        let Some(placed) = board.component(member.id) else {
            log::warn!("circuit member {} is not on the board", member.id);
            built.skipped.push(member.id);
            continue;
        };
        match add_member(&mut built.netlist, placed, *member) {
            Ok(probe) => built.probes.push(probe),
            Err(err) => {
                log::warn!("omitting {} from circuit: {}", placed.component().name(), err);
                built.skipped.push(member.id);
            }
        }
    }
    built
}

fn add_member(netlist: &mut Netlist, placed: &PlacedComponent, member: Member) -> Result<Probe> {
    let kind = placed.component().kind();
    let device = device_name(placed);
    let sense = sense_name(placed);
    check_parameters(&device, kind)?;

    let (start, end) = if member.forward {
        (placed.start(), placed.end())
    } else {
        (placed.end(), placed.start())
    };
    let start_label = start.node_label();
    let end_label = end.node_label();
    let mid_label = format!("m{}", placed.id());

    let voltage_node = match kind {
        ComponentKind::Battery { emf } => {
            let first = netlist.is_empty();
            let start_node = netlist.node(&start_label)?;
            let end_node = netlist.node(&end_label)?;
            let mid_node = if first {
                netlist.node(GROUND_LABEL)?
            } else {
                netlist.node(&mid_label)?
            };
            let index = netlist.next_current_index();
            netlist.add_device(VoltageSource::ammeter(&sense, start_node, mid_node, index))?;
            let index = netlist.next_current_index();
            netlist.add_device(VoltageSource::new(&device, end_node, mid_node, emf, index)?)?;
            end_label
        }
        ComponentKind::Resistor { resistance } => {
            let start_node = netlist.node(&start_label)?;
            let mid_node = netlist.node(&mid_label)?;
            let end_node = netlist.node(&end_label)?;
            let index = netlist.next_current_index();
            netlist.add_device(VoltageSource::ammeter(&sense, start_node, mid_node, index))?;
            netlist.add_device(Resistor::new(&device, mid_node, end_node, resistance)?)?;
            start_label
        }
        ComponentKind::Conductor => {
            let start_node = netlist.node(&start_label)?;
            let mid_node = netlist.node(&mid_label)?;
            let end_node = netlist.node(&end_label)?;
            let index = netlist.next_current_index();
            netlist.add_device(VoltageSource::ammeter(&sense, start_node, mid_node, index))?;
            let index = netlist.next_current_index();
            netlist.add_device(TransmissionLine::new(
                &device,
                (mid_node, end_node),
                (end_node, mid_node),
                index,
            ))?;
            start_label
        }
    };

    Ok(Probe {
        id: placed.id(),
        voltage_node,
        current_source: sense,
    })
}
