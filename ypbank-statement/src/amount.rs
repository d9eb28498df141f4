//! Денежные суммы и разбор сумм из банковских выгрузок.

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Количество знаков после запятой у всех сумм.
const SCALE: u32 = 2;

/// Денежная сумма со знаком, всегда округлённая до двух знаков.
///
/// Округление выполняется при создании и после каждой операции, поэтому
/// ошибка округления не накапливается в длинной цепочке сложений.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

/// Способ группировки разрядов при выводе суммы.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// 1,234,567.50
    Western,
    /// 12,34,567.50 (лакхи и кроры)
    Indian,
}

impl Money {
    /// Нулевая сумма.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Наибольшая сумма, которая хранится с двумя знаками после запятой.
    pub const MAX: Money = Money(Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, SCALE));
    /// Наименьшая (отрицательная) сумма.
    pub const MIN: Money = Money(Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, true, SCALE));

    /// Создает сумму, округляя значение до двух знаков.
    ///
    /// Значение, которое нельзя хранить с двумя знаками, ограничивается
    /// `Money::MAX` или `Money::MIN`.
    pub fn new(value: Decimal) -> Self {
        Money::checked_new(value).unwrap_or_else(|| {
            tracing::warn!("Сумма {} вне допустимого диапазона и ограничена", value);
            if value.is_sign_negative() {
                Money::MIN
            } else {
                Money::MAX
            }
        })
    }

    /// Создает сумму, если значение помещается в два знака после запятой.
    pub fn checked_new(value: Decimal) -> Option<Self> {
        let mut rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(SCALE);
        if rounded.scale() != SCALE {
            return None;
        }
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        Some(Money(rounded))
    }

    /// Создает сумму из минимальных единиц (пайсы, копейки, центы).
    pub fn from_minor(value: i64) -> Self {
        Money::new(Decimal::new(value, SCALE))
    }

    /// Значение как `Decimal`.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Сложение; `None` при переполнении.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).and_then(Money::checked_new)
    }

    /// Вычитание; `None` при переполнении.
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).and_then(Money::checked_new)
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Форматирует сумму с разделителями разрядов.
    pub fn format_grouped(&self, grouping: Grouping) -> String {
        let plain = self.abs().to_string();
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
        let grouped = match grouping {
            Grouping::Western => group_digits(int_part, 3, 3),
            Grouping::Indian => group_digits(int_part, 3, 2),
        };
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Разбивает целую часть на группы: первая группа справа длиной `first`,
/// остальные длиной `rest`.
fn group_digits(digits: &str, first: usize, rest: usize) -> String {
    if digits.len() <= first {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - first);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(rest);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);
    groups.join(",")
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(SCALE);
        write!(f, "{}", value)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())?;
        Money::checked_new(value).ok_or(rust_decimal::Error::ExceedsMaximumPossibleValue)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl Add for Money {
    type Output = Money;

    /// При переполнении сумма остается прежней.
    fn add(self, rhs: Money) -> Money {
        self.checked_add(rhs).unwrap_or_else(|| {
            tracing::warn!("Переполнение при сложении {} и {}, слагаемое пропущено", self, rhs);
            self
        })
    }
}

impl Sub for Money {
    type Output = Money;

    /// При переполнении сумма остается прежней.
    fn sub(self, rhs: Money) -> Money {
        self.checked_sub(rhs).unwrap_or_else(|| {
            tracing::warn!("Переполнение при вычитании {} из {}, вычитаемое пропущено", rhs, self);
            self
        })
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::new(-self.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + *m)
    }
}

/// Разбирает сумму из строки выгрузки.
///
/// Правила:
/// - `None`, пустая строка или одни пробелы дают ноль;
/// - запятые (разделители тысяч) и пробелы по краям отбрасываются;
/// - значение в скобках `(1,234.50)` считается отрицательным, знак внутри
///   скобок делает сумму некорректной;
/// - сумма, которую нельзя хранить с двумя знаками, некорректна;
/// - всё, что не удалось разобрать, дает ноль. Функция никогда не падает.
pub fn parse_amount(raw: Option<&str>) -> Money {
    let Some(raw) = raw else {
        return Money::ZERO;
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Money::ZERO;
    }

    let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();

    let (negate, body) = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner.trim()),
        None => (false, cleaned),
    };

    let parsed = if negate {
        parse_unsigned_decimal(body).map(|value| -value)
    } else {
        parse_signed_decimal(body)
    };
    match parsed.and_then(Money::checked_new) {
        Some(money) => money,
        None => {
            tracing::debug!("Некорректная сумма {:?}, используется 0.00", raw);
            Money::ZERO
        }
    }
}

fn parse_signed_decimal(s: &str) -> Option<Decimal> {
    let (negative, digits) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else if let Some(rest) = s.strip_suffix('-') {
        (true, rest)
    } else {
        (false, s)
    };

    let value = parse_unsigned_decimal(digits.trim())?;
    Some(if negative { -value } else { value })
}

fn parse_unsigned_decimal(digits: &str) -> Option<Decimal> {
    let valid = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
        && digits.matches('.').count() <= 1;
    if !valid {
        return None;
    }

    Decimal::from_str(digits).ok()
}
