pub fn column_index(label: &str) -> Option<usize> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let ordinal = ch.to_ascii_uppercase() as usize - 'A' as usize + 1;
        index = index * 26 + ordinal;
    }
    Some(index - 1)
}

pub fn column_label(index: usize) -> String {
    let mut value = index + 1;
    let mut label = String::new();
    while value > 0 {
        let rem = (value - 1) % 26;
        label.insert(0, (b'A' + rem as u8) as char);
        value = (value - 1) / 26;
    }
    label
}

pub fn quote_sheet_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

pub fn position_range(sheet: &str, x_col: usize, y_col: usize, row: u32) -> String {
    format!(
        "{}!{}{row}:{}{row}",
        quote_sheet_name(sheet),
        column_label(x_col),
        column_label(y_col)
    )
}

pub fn read_range(sheet: &str, first_data_row: u32, last_col: usize) -> String {
    format!(
        "{}!A{first_data_row}:{}",
        quote_sheet_name(sheet),
        column_label(last_col)
    )
}

pub fn append_range(sheet: &str, last_col: usize) -> String {
    format!("{}!A:{}", quote_sheet_name(sheet), column_label(last_col))
}
