//! Модуль обработки ошибок библиотеки.
//!
//! Здесь описаны только фатальные ошибки. Грязные суммы, отсутствующие поля
//! и недоступные логотипы не прерывают генерацию: они заменяются нулём,
//! пустой строкой или текстовой шапкой прямо на месте.

use thiserror::Error;

/// Основной тип ошибки библиотеки.
#[derive(Debug, Error)]
pub enum Error {
    /// Ошибка ввода/вывода
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка чтения CSV
    #[error("Ошибка CSV: {0}")]
    Csv(#[from] ::csv::Error),

    /// Ошибка разбора JSON-запроса или профиля
    #[error("Ошибка JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Неверный формат данных
    #[error("Неверный формат: {0}")]
    InvalidFormat(String),

    /// Банк отсутствует в реестре схем
    #[error("Неизвестный банк: {0}")]
    UnknownInstitution(String),

    /// Не удалось измерить высоту текста, строку нельзя разместить на странице
    #[error("Не удалось измерить текст {text:?}: {reason}")]
    Measurement {
        /// Текст, который не удалось измерить.
        text: String,
        /// Причина отказа.
        reason: String,
    },

    /// Ошибка поверхности отрисовки (PDF и т.п.)
    #[error("Ошибка отрисовки: {0}")]
    Render(String),
}

/// Тип Result с ошибкой библиотеки.
pub type Result<T> = std::result::Result<T, Error>;
