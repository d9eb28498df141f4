//! Измерение текста: ширина строки, перенос по словам, высота блока.

use crate::layout::instruction::FontSpec;
use thiserror::Error;

/// Причина, по которой текст нельзя измерить.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    #[error("некорректный кегль {0}")]
    InvalidFontSize(f32),
    #[error("некорректная ширина области {0}")]
    InvalidWidth(f32),
}

/// Измерение текста для верстки.
///
/// Обязателен только расчет ширины строки, перенос и высота выводятся из него.
pub trait TextMeasure {
    /// Ширина однострочного текста.
    fn text_width(&self, text: &str, font: &FontSpec) -> Result<f32, MeasureError>;

    /// Высота одной строки текста.
    fn line_height(&self, font: &FontSpec) -> f32 {
        font.size * 1.2
    }

    /// Жадный перенос по словам в область шириной `width`.
    ///
    /// Слово длиннее строки режется по символам. Пустой текст дает одну
    /// пустую строку, переводы строк в тексте сохраняются.
    fn wrap(&self, text: &str, font: &FontSpec, width: f32) -> Result<Vec<String>, MeasureError> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(MeasureError::InvalidFontSize(font.size));
        }
        if !width.is_finite() || width <= 0.0 {
            return Err(MeasureError::InvalidWidth(width));
        }

        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", current, word)
                };
                if self.text_width(&candidate, font)? <= width {
                    current = candidate;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if self.text_width(word, font)? <= width {
                    current = word.to_string();
                } else {
                    let mut pieces = self.break_word(word, font, width)?;
                    current = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }
            lines.push(current);
        }
        Ok(lines)
    }

    /// Режет слово на куски, каждый из которых помещается в `width`.
    /// В каждом куске минимум один символ.
    fn break_word(&self, word: &str, font: &FontSpec, width: f32) -> Result<Vec<String>, MeasureError> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for ch in word.chars() {
            current.push(ch);
            if current.chars().count() > 1 && self.text_width(&current, font)? > width {
                current.pop();
                pieces.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        Ok(pieces)
    }

    /// Высота текста после переноса: число строк на высоту строки.
    fn text_height(&self, text: &str, font: &FontSpec, width: f32) -> Result<f32, MeasureError> {
        let lines = self.wrap(text, font, width)?.len().max(1);
        Ok(lines as f32 * self.line_height(font))
    }
}

/// Приближенные метрики Helvetica: ширина символа в долях кегля.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMetrics;

impl ApproxMetrics {
    fn char_em(ch: char) -> f32 {
        match ch {
            'i' | 'j' | 'l' => 0.222,
            ' ' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.278,
            'f' | 't' | 'r' | 'I' | '/' | '\\' | '(' | ')' | '[' | ']' | '-' => 0.333,
            'm' | 'M' => 0.833,
            'w' => 0.722,
            'W' => 0.944,
            '0'..='9' | 'a'..='z' => 0.556,
            'A'..='Z' => 0.667,
            _ => 0.6,
        }
    }
}

impl TextMeasure for ApproxMetrics {
    fn text_width(&self, text: &str, font: &FontSpec) -> Result<f32, MeasureError> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(MeasureError::InvalidFontSize(font.size));
        }
        let em: f32 = text.chars().map(Self::char_em).sum();
        let weight = if font.bold { 1.06 } else { 1.0 };
        Ok(em * font.size * weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: FontSpec = FontSpec::regular(10.0);

    #[test]
    fn test_short_text_is_one_line() {
        let lines = ApproxMetrics.wrap("NEFT ACME", &FONT, 200.0).unwrap();
        assert_eq!(lines, vec!["NEFT ACME".to_string()]);
    }

    #[test]
    fn test_wrap_by_words() {
        let lines = ApproxMetrics
            .wrap("UPI payment to grocery store near the station", &FONT, 80.0)
            .unwrap();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(ApproxMetrics.text_width(line, &FONT).unwrap() <= 80.0);
        }
        assert_eq!(lines.join(" "), "UPI payment to grocery store near the station");
    }

    #[test]
    fn test_long_word_is_broken() {
        let word = "NEFT/HDFC0001234/ACMEINDUSTRIESPRIVATELIMITED";
        let lines = ApproxMetrics.wrap(word, &FONT, 60.0).unwrap();
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_empty_text_has_one_line_height() {
        let h = ApproxMetrics.text_height("", &FONT, 50.0).unwrap();
        assert_eq!(h, ApproxMetrics.line_height(&FONT));
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            ApproxMetrics.wrap("x", &FONT, 0.0),
            Err(MeasureError::InvalidWidth(0.0))
        );
        assert!(ApproxMetrics
            .text_height("x", &FontSpec::regular(f32::NAN), 10.0)
            .is_err());
    }

    #[test]
    fn test_two_lines_not_lower_than_one() {
        let one = ApproxMetrics.text_height("Salary", &FONT, 100.0).unwrap();
        let two = ApproxMetrics.text_height("Salary\nApril 2024", &FONT, 100.0).unwrap();
        assert!(two >= one);
    }
}
