use super::Binding;
use crate::error::{RorError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Результат чтения файла шорткатов: корректные биндинги и ошибки по строкам.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Номер строки (с единицы) и биндинг.
    pub bindings: Vec<(usize, Binding)>,
    pub errors: Vec<RorError>,
}

/// Разобрать содержимое файла. Плохая строка пропускается, остальные грузятся.
pub fn parse_bindings(source: &str) -> LoadReport {
    let mut report = LoadReport::default();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if is_skipped(line) {
            continue;
        }

        match Binding::parse(line) {
            Ok(binding) => {
                for unknown in binding.behavior.unknown() {
                    debug!("Строка {}: неизвестный флаг '{}' игнорируется", line_no, unknown);
                }
                report.bindings.push((line_no, binding));
            }
            Err(source) => {
                warn!("Строка {} пропущена: {} ('{}')", line_no, source, line);
                report.errors.push(RorError::Parse { line: line_no, source });
            }
        }
    }

    report
}

/// Прочитать файл шорткатов с диска.
pub fn load_bindings<P: AsRef<Path>>(path: P) -> Result<LoadReport> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| {
        RorError::Config(anyhow::anyhow!("Не удалось прочитать файл шорткатов {:?}: {}", path, e))
    })?;

    let report = parse_bindings(&source);
    info!(
        "Загружено {} шорткатов из {:?} ({} с ошибками)",
        report.bindings.len(),
        path,
        report.errors.len()
    );
    Ok(report)
}

/// Пустые строки, комментарии и заголовки секций.
fn is_skipped(line: &str) -> bool {
    line.is_empty()
        || line.starts_with('#')
        || line.starts_with(';')
        || (line.starts_with('[') && line.ends_with(']'))
}
