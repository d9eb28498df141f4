//! Расчет текущего остатка по последовательности транзакций.

use crate::amount::Money;
use crate::resolve::ResolvedEntry;

/// Транзакция с вычисленным остатком.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Порядковый номер, начиная с 1.
    pub position: usize,
    pub entry: ResolvedEntry,
    /// Остаток после этой транзакции.
    pub balance: Money,
}

/// Итоги выписки, считаются один раз по всему журналу.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerTotals {
    pub opening: Money,
    pub total_debit: Money,
    pub total_credit: Money,
    pub closing: Money,
    pub count: usize,
}

impl LedgerTotals {
    pub fn from_ledger(opening: Money, ledger: &[LedgerEntry]) -> Self {
        Self {
            opening,
            total_debit: ledger.iter().map(|e| e.entry.debit).sum(),
            total_credit: ledger.iter().map(|e| e.entry.credit).sum(),
            closing: ledger.last().map(|e| e.balance).unwrap_or(opening),
            count: ledger.len(),
        }
    }
}

/// Один шаг свертки: остаток после транзакции.
pub fn next_balance(previous: Money, entry: &ResolvedEntry) -> Money {
    previous - entry.debit + entry.credit
}

/// Считает остатки в порядке входа, без сортировки.
///
/// Каждой входной записи соответствует ровно одна выходная. Суммы
/// округляются на каждом шаге (это делает сам `Money`).
pub fn compute_ledger(entries: Vec<ResolvedEntry>, opening_balance: Money) -> Vec<LedgerEntry> {
    let mut balance = opening_balance;
    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            balance = next_balance(balance, &entry);
            LedgerEntry {
                position: idx + 1,
                entry,
                balance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(debit: i64, credit: i64) -> ResolvedEntry {
        ResolvedEntry {
            debit: Money::from_minor(debit),
            credit: Money::from_minor(credit),
            ..ResolvedEntry::default()
        }
    }

    #[test]
    fn test_running_balance() {
        let ledger = compute_ledger(
            vec![entry(10000, 0), entry(0, 25000), entry(5000, 0)],
            Money::ZERO,
        );
        let balances: Vec<Money> = ledger.iter().map(|e| e.balance).collect();
        assert_eq!(
            balances,
            [Money::from_minor(-10000), Money::from_minor(15000), Money::from_minor(10000)]
        );
        assert_eq!(ledger[0].position, 1);
        assert_eq!(ledger[2].position, 3);
    }

    #[test]
    fn test_totals() {
        let opening = Money::from_minor(5000);
        let ledger = compute_ledger(vec![entry(10000, 0), entry(0, 25000), entry(5000, 0)], opening);
        let totals = LedgerTotals::from_ledger(opening, &ledger);
        assert_eq!(totals.total_debit, Money::from_minor(15000));
        assert_eq!(totals.total_credit, Money::from_minor(25000));
        assert_eq!(totals.closing, Money::from_minor(15000));
        assert_eq!(totals.count, 3);
    }

    #[test]
    fn test_empty_ledger_closes_at_opening() {
        let opening = Money::from_minor(777);
        let totals = LedgerTotals::from_ledger(opening, &compute_ledger(Vec::new(), opening));
        assert_eq!(totals.closing, opening);
        assert_eq!(totals.count, 0);
    }

    #[test]
    fn test_order_matters() {
        let forward = compute_ledger(vec![entry(100, 0), entry(0, 300)], Money::ZERO);
        let backward = compute_ledger(vec![entry(0, 300), entry(100, 0)], Money::ZERO);
        assert_ne!(forward[0].balance, backward[0].balance);
        assert_eq!(forward[1].balance, backward[1].balance);
    }
}
