//! Разбиение строки биндинга на поля.
//!
//! Поля разделяются запятыми. Запятая внутри парных двойных кавычек не
//! является разделителем, `\"` не считается кавычкой. Непарная кавычка
//! остаётся обычным символом.

/// Разбить строку на поля, обрезать пробелы и снять внешние кавычки.
pub fn split_fields(line: &str) -> Vec<String> {
    let spans = quoted_spans(line);
    let inside = |at: usize| spans.iter().any(|&(open, close)| open < at && at < close);

    let mut fields = Vec::new();
    let mut start = 0;
    for (at, ch) in line.char_indices() {
        if ch == ',' && !inside(at) {
            fields.push(clean_field(&line[start..at]));
            start = at + 1;
        }
    }
    fields.push(clean_field(&line[start..]));
    fields
}

/// Обернуть значение в кавычки, если без них оно не переживёт разбор.
pub fn quote_field(value: &str) -> String {
    let needs_quotes = value.contains(',')
        || value.contains('"')
        || value.trim() != value;
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Байтовые позиции пар неэкранированных кавычек. Последняя непарная отбрасывается.
fn quoted_spans(line: &str) -> Vec<(usize, usize)> {
    let mut quotes = Vec::new();
    let mut escaped = false;
    for (at, ch) in line.char_indices() {
        match ch {
            '\\' if !escaped => {
                escaped = true;
                continue;
            }
            '"' if !escaped => quotes.push(at),
            _ => {}
        }
        escaped = false;
    }

    quotes
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim().replace("\\\"", "\"")
    } else {
        trimmed.to_string()
    }
}
