use crate::error::{RorError, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const INPUT_DIR: &str = "/dev/input";

/// Проверить, что клавиатурные устройства читаются без root.
pub fn check_permissions() -> Result<()> {
    info!("Проверка прав доступа...");

    check_input_devices_access()?;
    check_not_root();

    info!("Проверка прав доступа завершена успешно");
    Ok(())
}

fn check_input_devices_access() -> Result<()> {
    if !Path::new(INPUT_DIR).exists() {
        return Err(RorError::Permission(format!(
            "Директория {} не существует",
            INPUT_DIR
        )));
    }

    fs::read_dir(INPUT_DIR).map_err(|e| {
        for command in setup_commands() {
            warn!("{}", command);
        }
        RorError::Permission(format!(
            "Нет доступа к {}: {}. Добавьте пользователя в группу 'input'",
            INPUT_DIR, e
        ))
    })?;

    info!("Доступ к {} подтвержден", INPUT_DIR);
    Ok(())
}

fn check_not_root() {
    match std::env::var("USER") {
        Ok(user) if user == "root" => {
            // Под root окна и сессионная шина чужие
            warn!("⚠️  Приложение запущено от имени root!");
            warn!("   Окна и уведомления пользовательской сессии могут быть недоступны");
            warn!("   Запускайте от обычного пользователя из группы 'input'");
        }
        Ok(user) => info!("Приложение запущено от имени пользователя: {}", user),
        Err(_) => warn!("Не удалось определить пользователя"),
    }
}

/// Рекомендуемые команды для настройки прав доступа
pub fn setup_commands() -> Vec<String> {
    vec![
        "# Добавить пользователя в группу input:".to_string(),
        "sudo usermod -a -G input $USER".to_string(),
        "# После выполнения команды перезайдите в систему".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_commands() {
        let commands = setup_commands();
        assert!(commands.iter().any(|cmd| cmd.contains("usermod")));
    }
}
