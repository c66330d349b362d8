use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use padforge_core::event_analyzer::{AnalyzedMoment, OnionSkin, Transition};
use padforge_protocol::{Difficulty, SolverResult};

fn difficulty_cell(d: Difficulty) -> Cell {
    match d {
        Difficulty::Easy => Cell::new("Easy").fg(Color::Green),
        Difficulty::Medium => Cell::new("Medium").fg(Color::Yellow),
        Difficulty::Hard => Cell::new("Hard").fg(Color::Red),
        Difficulty::Unplayable => Cell::new("Unplayable").fg(Color::Red).add_attribute(Attribute::Bold),
    }
}

pub fn print_solve_summary(result: &SolverResult) {
    let mut header = Table::new();
    header.load_preset(ASCII_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    header.add_row(vec![
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Hard").fg(Color::Yellow),
        Cell::new("Unplayable").fg(Color::Red),
        Cell::new("Avg Drift"),
    ]);
    header.add_row(vec![
        Cell::new(result.score.to_string()),
        Cell::new(result.hard_count.to_string()),
        Cell::new(result.unplayable_count.to_string()),
        Cell::new(format!("{:.2}", result.average_drift)),
    ]);
    println!("\n{}", header);

    let mut events = Table::new();
    events.load_preset(ASCII_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    events.add_row(vec![
        Cell::new("Pitch").add_attribute(Attribute::Bold),
        Cell::new("Start"),
        Cell::new("Hand"),
        Cell::new("Finger"),
        Cell::new("Pad"),
        Cell::new("Cost"),
        Cell::new("Difficulty"),
    ]);
    for event in &result.debug_events {
        let hand = event.hand.map(|h| format!("{:?}", h)).unwrap_or_else(|| "-".into());
        let finger = event.finger.map(|f| format!("{:?}", f)).unwrap_or_else(|| "-".into());
        let pad = match (event.row, event.col) {
            (Some(r), Some(c)) => format!("{},{}", r, c),
            _ => "-".into(),
        };
        events.add_row(vec![
            Cell::new(event.pitch.to_string()),
            Cell::new(format!("{:.3}", event.start_time)),
            Cell::new(hand),
            Cell::new(finger),
            Cell::new(pad),
            Cell::new(format!("{:.2}", event.total_cost)),
            difficulty_cell(event.difficulty),
        ]);
    }
    println!("\n{}", events);

    if !result.finger_usage_stats.is_empty() {
        let mut usage = Table::new();
        usage.load_preset(ASCII_FULL).set_content_arrangement(ContentArrangement::Dynamic);
        usage.add_row(vec![Cell::new("Finger").add_attribute(Attribute::Bold), Cell::new("Count")]);
        let mut sorted: Vec<_> = result.finger_usage_stats.iter().collect();
        sorted.sort_by_key(|(k, _)| k.clone());
        for (key, count) in sorted {
            usage.add_row(vec![Cell::new(key), Cell::new(count.to_string())]);
        }
        println!("\n{}", usage);
    }
}

pub fn print_moments(moments: &[AnalyzedMoment]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("t"),
        Cell::new("Polyphony"),
        Cell::new("Spread"),
        Cell::new("Stretch"),
        Cell::new("Difficulty"),
    ]);
    for moment in moments {
        table.add_row(vec![
            Cell::new(moment.event_index.to_string()),
            Cell::new(format!("{:.3}", moment.timestamp)),
            Cell::new(moment.metrics.polyphony.to_string()),
            Cell::new(format!("{:.1}x{:.1}", moment.metrics.spread_x, moment.metrics.spread_y)),
            Cell::new(format!("{:.2}", moment.metrics.anatomical_stretch)),
            Cell::new(format!("{:.2}", moment.metrics.composite_difficulty)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_transitions(transitions: &[Transition]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("From").add_attribute(Attribute::Bold),
        Cell::new("To"),
        Cell::new("dt (ms)"),
        Cell::new("Distance"),
        Cell::new("Hand Switch"),
        Cell::new("Finger Change"),
        Cell::new("Speed Pressure"),
    ]);
    for t in transitions {
        table.add_row(vec![
            Cell::new(t.from_index.to_string()),
            Cell::new(t.to_index.to_string()),
            Cell::new(format!("{:.1}", t.metrics.time_delta_ms)),
            Cell::new(format!("{:.2}", t.metrics.grid_distance)),
            Cell::new(if t.metrics.hand_switch { "yes" } else { "no" }),
            Cell::new(if t.metrics.finger_change { "yes" } else { "no" }),
            Cell::new(format!("{:.2}", t.metrics.speed_pressure)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_onion_skin(index: usize, skin: &OnionSkin) {
    println!("\nOnion skin for moment {} -> {}", index, index + 1);
    println!("  shared pads:       {:?}", skin.shared_pads);
    println!("  current-only pads: {:?}", skin.current_only_pads);
    println!("  next-only pads:    {:?}", skin.next_only_pads);

    let mut table = Table::new();
    table.load_preset(ASCII_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("Hand").add_attribute(Attribute::Bold),
        Cell::new("Finger"),
        Cell::new("From"),
        Cell::new("To"),
        Cell::new("Hold"),
        Cell::new("Distance"),
        Cell::new("Impossible"),
    ]);
    for mv in &skin.finger_moves {
        let from = mv.from_pad.map(|p| p.to_string()).unwrap_or_else(|| "-".into());
        let dist = mv.raw_distance.map(|d| format!("{:.2}", d)).unwrap_or_else(|| "-".into());
        table.add_row(vec![
            Cell::new(format!("{:?}", mv.hand)),
            Cell::new(format!("{:?}", mv.finger)),
            Cell::new(from),
            Cell::new(mv.to_pad.to_string()),
            Cell::new(if mv.is_hold { "yes" } else { "no" }),
            Cell::new(dist),
            if mv.is_impossible {
                Cell::new("yes").fg(Color::Red)
            } else {
                Cell::new("no")
            },
        ]);
    }
    println!("{}", table);
}
