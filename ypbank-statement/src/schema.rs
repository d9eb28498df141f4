//! Реестр банковских схем.
//!
//! Схема описывает, какие колонки есть у выписки конкретного банка, как они
//! подписаны, какие поля счета выводятся в шапке и под какими именами эти
//! колонки встречаются во входных файлах. Все схемы статичны и не меняются
//! во время работы.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Идентификатор поддерживаемого банка.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankId {
    /// State Bank of India
    Sbi,
    /// Punjab National Bank
    Pnb,
    /// HDFC Bank
    Hdfc,
    /// ICICI Bank
    Icici,
    /// Axis Bank
    Axis,
    /// Kotak Mahindra Bank
    Kotak,
    /// Bank of Baroda
    Bob,
    /// Canara Bank
    Canara,
}

impl BankId {
    /// Все поддерживаемые банки в порядке вывода.
    pub const ALL: [BankId; 8] = [
        BankId::Sbi,
        BankId::Pnb,
        BankId::Hdfc,
        BankId::Icici,
        BankId::Axis,
        BankId::Kotak,
        BankId::Bob,
        BankId::Canara,
    ];

    /// Короткий код банка (SBI, PNB и т.д.).
    pub fn code(&self) -> &'static str {
        match self {
            BankId::Sbi => "SBI",
            BankId::Pnb => "PNB",
            BankId::Hdfc => "HDFC",
            BankId::Icici => "ICICI",
            BankId::Axis => "AXIS",
            BankId::Kotak => "KOTAK",
            BankId::Bob => "BOB",
            BankId::Canara => "CANARA",
        }
    }
}

impl fmt::Display for BankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BankId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        BankId::ALL
            .into_iter()
            .find(|id| id.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| Error::UnknownInstitution(code.to_string()))
    }
}

/// Каноническое поле транзакции.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    ValueDate,
    Description,
    ChequeNo,
    RefNo,
    BranchCode,
    Debit,
    Credit,
    /// Сумма со знаком или с отдельным индикатором дебет/кредит.
    Amount,
    /// Индикатор дебет/кредит (`Dr`/`Cr`).
    DrCr,
    Balance,
}

impl Field {
    /// Каноническое имя поля, оно же имя колонки в CSV-шаблоне.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::ValueDate => "value_date",
            Field::Description => "description",
            Field::ChequeNo => "cheque_no",
            Field::RefNo => "ref_no",
            Field::BranchCode => "branch_code",
            Field::Debit => "debit",
            Field::Credit => "credit",
            Field::Amount => "amount",
            Field::DrCr => "dr_cr",
            Field::Balance => "balance",
        }
    }

    /// Денежное поле (выравнивается вправо, разбирается как сумма).
    pub const fn is_monetary(&self) -> bool {
        matches!(self, Field::Debit | Field::Credit | Field::Amount | Field::Balance)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Способ кодирования дебета и кредита во входных данных.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountMode {
    /// Отдельные колонки списания и поступления.
    Split,
    /// Одна колонка суммы и колонка индикатора `Dr`/`Cr`.
    Indicator,
}

/// Описание выписки одного банка.
#[derive(Debug)]
pub struct BankSchema {
    pub id: BankId,
    /// Полное название банка.
    pub name: &'static str,
    /// Колонки таблицы транзакций: каноническое поле и подпись.
    pub transaction_fields: &'static [(Field, &'static str)],
    /// Поля счета для шапки: ключ профиля и подпись.
    pub account_fields: &'static [(&'static str, &'static str)],
    /// Синонимы колонок входного файла в порядке приоритета.
    pub synonyms: &'static [(Field, &'static [&'static str])],
    pub amount_mode: AmountMode,
}

impl BankSchema {
    /// Синонимы поля в порядке приоритета. Пустой срез, если поле не объявлено.
    pub fn synonyms_for(&self, field: Field) -> &'static [&'static str] {
        self.synonyms
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    /// Подпись колонки транзакций.
    pub fn label(&self, field: Field) -> Option<&'static str> {
        self.transaction_fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, label)| *label)
    }

    /// Подпись поля счета.
    pub fn account_label(&self, key: &str) -> Option<&'static str> {
        self.account_fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, label)| *label)
    }

    /// Канонические колонки входного файла.
    ///
    /// Для схем с индикатором колонки `debit`/`credit` заменяются парой
    /// `amount`/`dr_cr`.
    pub fn input_fields(&self) -> Vec<Field> {
        let mut fields = Vec::with_capacity(self.transaction_fields.len());
        for (field, _) in self.transaction_fields {
            match (self.amount_mode, field) {
                (AmountMode::Indicator, Field::Debit) => {
                    fields.push(Field::Amount);
                    fields.push(Field::DrCr);
                }
                (AmountMode::Indicator, Field::Credit) => {}
                _ => fields.push(*field),
            }
        }
        fields
    }
}

// =============================================================================
// Общие синонимы
// =============================================================================

const DATE: &[&str] = &["date", "txn date", "transaction date", "tran date", "trans date", "posting date"];
const VALUE_DATE: &[&str] = &["value_date", "value date", "value dt", "valuedate"];
const DESCRIPTION: &[&str] = &[
    "description",
    "narration",
    "particulars",
    "transaction remarks",
    "remarks",
    "details",
];
const CHEQUE_NO: &[&str] = &["cheque_no", "cheque no.", "cheque no", "cheque number", "chq. no.", "chqno", "chq no"];
const REF_NO: &[&str] = &["ref_no", "ref no.", "ref no", "chq./ref.no.", "chq/ref no", "ref/cheque no.", "reference"];
const BRANCH_CODE: &[&str] = &["branch_code", "branch code", "branch", "sol"];
const DEBIT: &[&str] = &["debit", "withdrawal", "withdrawals", "withdrawal amt.", "debit amount", "dr"];
const CREDIT: &[&str] = &["credit", "deposit", "deposits", "deposit amt.", "credit amount", "cr"];
const AMOUNT: &[&str] = &["amount", "transaction amount", "transaction amount(inr)", "amt"];
const DR_CR: &[&str] = &["dr_cr", "cr/dr", "dr/cr", "dr / cr", "type", "indicator"];
const BALANCE: &[&str] = &["balance", "closing balance", "bal", "running balance"];

const COMMON_SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Date, DATE),
    (Field::ValueDate, VALUE_DATE),
    (Field::Description, DESCRIPTION),
    (Field::ChequeNo, CHEQUE_NO),
    (Field::RefNo, REF_NO),
    (Field::BranchCode, BRANCH_CODE),
    (Field::Debit, DEBIT),
    (Field::Credit, CREDIT),
    (Field::Amount, AMOUNT),
    (Field::DrCr, DR_CR),
    (Field::Balance, BALANCE),
];

/// PNB исторически присылает `withdrawal`/`deposit` раньше `debit`/`credit`.
const PNB_SYNONYMS: &[(Field, &[&str])] = &[
    (Field::Date, DATE),
    (Field::ValueDate, VALUE_DATE),
    (Field::Description, DESCRIPTION),
    (Field::ChequeNo, CHEQUE_NO),
    (Field::RefNo, REF_NO),
    (Field::BranchCode, BRANCH_CODE),
    (Field::Debit, &["withdrawal", "debit", "withdrawals", "dr"]),
    (Field::Credit, &["deposit", "credit", "deposits", "cr"]),
    (Field::Amount, AMOUNT),
    (Field::DrCr, DR_CR),
    (Field::Balance, BALANCE),
];

const STANDARD_ACCOUNT: &[(&str, &str)] = &[
    ("account_name", "Account Name"),
    ("address", "Address"),
    ("account_number", "Account Number"),
    ("account_type", "Account Type"),
    ("branch", "Branch"),
    ("ifsc", "IFSC Code"),
    ("statement_period", "Statement Period"),
];

// =============================================================================
// Схемы банков
// =============================================================================

static SCHEMAS: [BankSchema; 8] = [
    BankSchema {
        id: BankId::Sbi,
        name: "State Bank of India",
        transaction_fields: &[
            (Field::Date, "Txn Date"),
            (Field::ValueDate, "Value Date"),
            (Field::Description, "Description"),
            (Field::RefNo, "Ref No./Cheque No."),
            (Field::BranchCode, "Branch Code"),
            (Field::Debit, "Debit"),
            (Field::Credit, "Credit"),
            (Field::Balance, "Balance"),
        ],
        account_fields: &[
            ("account_name", "Account Name"),
            ("address", "Address"),
            ("account_number", "Account Number"),
            ("cif_number", "CIF No."),
            ("branch", "Branch"),
            ("ifsc", "IFS Code"),
            ("micr", "MICR Code"),
            ("statement_period", "Statement Period"),
        ],
        synonyms: COMMON_SYNONYMS,
        amount_mode: AmountMode::Split,
    },
    BankSchema {
        id: BankId::Pnb,
        name: "Punjab National Bank",
        transaction_fields: &[
            (Field::Date, "Txn Date"),
            (Field::ChequeNo, "Cheque No."),
            (Field::Description, "Narration"),
            (Field::Debit, "Withdrawal"),
            (Field::Credit, "Deposit"),
            (Field::Balance, "Balance"),
        ],
        account_fields: &[
            ("account_name", "Customer Name"),
            ("address", "Address"),
            ("account_number", "Account No."),
            ("customer_id", "Customer ID"),
            ("branch", "Branch Name"),
            ("ifsc", "IFSC"),
            ("statement_period", "Period"),
        ],
        synonyms: PNB_SYNONYMS,
        amount_mode: AmountMode::Split,
    },
    BankSchema {
        id: BankId::Hdfc,
        name: "HDFC Bank",
        transaction_fields: &[
            (Field::Date, "Date"),
            (Field::Description, "Narration"),
            (Field::RefNo, "Chq./Ref.No."),
            (Field::ValueDate, "Value Dt"),
            (Field::Debit, "Withdrawal Amt."),
            (Field::Credit, "Deposit Amt."),
            (Field::Balance, "Closing Balance"),
        ],
        account_fields: &[
            ("account_name", "Name"),
            ("address", "Address"),
            ("account_number", "Account No"),
            ("customer_id", "Cust ID"),
            ("account_type", "A/C Type"),
            ("branch", "Account Branch"),
            ("ifsc", "RTGS/NEFT IFSC"),
            ("statement_period", "Statement From"),
        ],
        synonyms: COMMON_SYNONYMS,
        amount_mode: AmountMode::Split,
    },
    BankSchema {
        id: BankId::Icici,
        name: "ICICI Bank",
        transaction_fields: &[
            (Field::Date, "Transaction Date"),
            (Field::ValueDate, "Value Date"),
            (Field::ChequeNo, "Cheque Number"),
            (Field::Description, "Transaction Remarks"),
            (Field::Debit, "Withdrawal Amount (INR)"),
            (Field::Credit, "Deposit Amount (INR)"),
            (Field::Balance, "Balance (INR)"),
        ],
        account_fields: &[
            ("account_name", "Account Holder"),
            ("address", "Address"),
            ("account_number", "Account Number"),
            ("customer_id", "Customer ID"),
            ("branch", "Branch"),
            ("ifsc", "IFSC Code"),
            ("statement_period", "Transactions List"),
        ],
        synonyms: COMMON_SYNONYMS,
        amount_mode: AmountMode::Indicator,
    },
    BankSchema {
        id: BankId::Axis,
        name: "Axis Bank",
        transaction_fields: &[
            (Field::Date, "Tran Date"),
            (Field::ChequeNo, "CHQNO"),
            (Field::Description, "PARTICULARS"),
            (Field::Debit, "DR"),
            (Field::Credit, "CR"),
            (Field::Balance, "BAL"),
            (Field::BranchCode, "SOL"),
        ],
        account_fields: &[
            ("account_name", "Name"),
            ("address", "Address"),
            ("account_number", "Account No"),
            ("customer_id", "Customer ID"),
            ("scheme", "Scheme"),
            ("ifsc", "IFSC Code"),
            ("statement_period", "Statement of Account for the period"),
        ],
        synonyms: COMMON_SYNONYMS,
        amount_mode: AmountMode::Split,
    },
    BankSchema {
        id: BankId::Kotak,
        name: "Kotak Mahindra Bank",
        transaction_fields: &[
            (Field::Date, "Date"),
            (Field::Description, "Narration"),
            (Field::RefNo, "Chq/Ref No"),
            (Field::Debit, "Withdrawal (Dr)"),
            (Field::Credit, "Deposit (Cr)"),
            (Field::Balance, "Balance"),
        ],
        account_fields: &[
            ("account_name", "Account Name"),
            ("address", "Address"),
            ("account_number", "Account No."),
            ("crn", "CRN"),
            ("branch", "Branch"),
            ("ifsc", "IFSC Code"),
            ("statement_period", "Period"),
        ],
        synonyms: COMMON_SYNONYMS,
        amount_mode: AmountMode::Indicator,
    },
    BankSchema {
        id: BankId::Bob,
        name: "Bank of Baroda",
        transaction_fields: &[
            (Field::Date, "Date"),
            (Field::Description, "Narration"),
            (Field::ChequeNo, "Chq. No."),
            (Field::Debit, "Withdrawal"),
            (Field::Credit, "Deposit"),
            (Field::Balance, "Balance"),
        ],
        account_fields: STANDARD_ACCOUNT,
        synonyms: COMMON_SYNONYMS,
        amount_mode: AmountMode::Split,
    },
    BankSchema {
        id: BankId::Canara,
        name: "Canara Bank",
        transaction_fields: &[
            (Field::Date, "Trans Date"),
            (Field::ValueDate, "Value Date"),
            (Field::BranchCode, "Branch"),
            (Field::RefNo, "Ref/Cheque No."),
            (Field::Description, "Description"),
            (Field::Debit, "Debit"),
            (Field::Credit, "Credit"),
            (Field::Balance, "Balance"),
        ],
        account_fields: &[
            ("account_name", "Account Holder"),
            ("address", "Address"),
            ("account_number", "Account Number"),
            ("customer_id", "Customer Id"),
            ("branch", "Branch Name"),
            ("ifsc", "IFSC Code"),
            ("micr", "MICR Code"),
            ("statement_period", "Searched By"),
        ],
        synonyms: COMMON_SYNONYMS,
        amount_mode: AmountMode::Split,
    },
];

/// Схема банка по идентификатору.
pub fn schema(id: BankId) -> &'static BankSchema {
    SCHEMAS
        .iter()
        .find(|s| s.id == id)
        .unwrap_or_else(|| unreachable!("в реестре нет схемы для {}", id))
}

/// Схема банка по коду. Неизвестный код является фатальной ошибкой запроса.
pub fn schema_for(code: &str) -> Result<&'static BankSchema> {
    let id: BankId = code.parse()?;
    Ok(schema(id))
}
