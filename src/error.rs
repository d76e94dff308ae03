use thiserror::Error;

#[derive(Error, Debug)]
pub enum RorError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Строка {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("Устройство не найдено: {0}")]
    DeviceNotFound(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),

    #[error("Ошибка внешней команды: {0}")]
    Command(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl RorError {
    pub fn device_not_found<T>(msg: impl Into<String>) -> Result<T> {
        Err(RorError::DeviceNotFound(msg.into()))
    }
}

/// Ошибка разбора одной строки с биндингом. Фатальна только для этой строки.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("не указан шорткат")]
    MissingShortcut,

    #[error("некорректное регулярное выражение /{pattern}/: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RorError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! ror_error {
    (command, $($arg:tt)*) => {
        $crate::error::RorError::Command(format!($($arg)*))
    };
}
