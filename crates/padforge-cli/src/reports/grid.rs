use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

pub fn print_pitch_grid(rows: &[(u8, Option<(u8, u8)>)]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL).set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Pitch").add_attribute(Attribute::Bold),
        Cell::new("Pad (row,col)"),
    ]);
    if let Some(col) = table.column_mut(0) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    for (pitch, pad) in rows {
        let cell = match pad {
            Some((row, col)) => Cell::new(format!("{},{}", row, col)).fg(Color::Green),
            None => Cell::new("off-grid").fg(Color::Red),
        };
        table.add_row(vec![Cell::new(pitch.to_string()), cell]);
    }
    println!("\n{}", table);
}
