//! Static schema registry: the shape of each entity (columns, types,
//! nullability, foreign keys) plus its validation rule set and API surface.
//! Consumed by the migration DDL, the SQL builder, the validator, and the
//! generic resource handlers.

use crate::error::AppError;
use crate::password;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Text,
    Boolean,
    Double,
}

impl ColumnType {
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnType::BigInt => "BIGINT",
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Double => "DOUBLE PRECISION",
        }
    }
}

/// One declared column. `id`, `created_at` and `updated_at` are implicit on
/// every table and are not listed here.
#[derive(Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub nullable: bool,
    /// SQL default expression, e.g. "TRUE". Absent columns fall back to this
    /// on insert and on full replace.
    pub default: Option<&'static str>,
    /// (table, column) this column references.
    pub references: Option<(&'static str, &'static str)>,
    pub unique: bool,
}

const fn column(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        ty,
        nullable: false,
        default: None,
        references: None,
        unique: false,
    }
}

const fn nullable_column(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        ty,
        nullable: true,
        default: None,
        references: None,
        unique: false,
    }
}

const fn unique_column(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef {
        name,
        ty,
        nullable: false,
        default: None,
        references: None,
        unique: true,
    }
}

const fn defaulted_column(name: &'static str, ty: ColumnType, default: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty,
        nullable: false,
        default: Some(default),
        references: None,
        unique: false,
    }
}

/// BIGINT column referencing another table's id.
const fn fk_column(name: &'static str, table: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        ty: ColumnType::BigInt,
        nullable: false,
        default: None,
        references: Some((table, "id")),
        unique: false,
    }
}

#[derive(Debug)]
pub enum RuleKind {
    /// String with length bounds (chars).
    Text { min: usize, max: usize },
    /// String matching a regular expression; `hint` completes the violation
    /// message ("<field> <hint>").
    Pattern {
        pattern: &'static str,
        hint: &'static str,
    },
    Integer { positive: bool },
    Number { positive: bool },
    Email,
    /// Date-shaped string: YYYY-MM-DD or RFC 3339.
    Date,
    Boolean,
}

/// One validation rule, keyed by the API (camelCase) field name. Rules are a
/// slice, not a map, so violations come out in declared order.
#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub kind: RuleKind,
}

/// Hook run on the snake_cased body after validation and before persistence.
pub type PrepareFn = fn(&mut Map<String, Value>) -> Result<(), AppError>;

pub struct EntityDef {
    /// URL path segment the resource is mounted under, e.g. "bankDetails".
    pub path: &'static str,
    pub table: &'static str,
    /// Key wrapping the record in create responses, e.g. "user".
    pub response_key: &'static str,
    /// Human-facing name for messages, e.g. "Bank details".
    pub display: &'static str,
    pub columns: &'static [ColumnDef],
    /// Columns excluded from every SELECT / RETURNING list.
    pub sensitive: &'static [&'static str],
    pub rules: &'static [FieldRule],
    pub prepare: Option<PrepareFn>,
}

impl EntityDef {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn unique_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.unique)
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.sensitive.contains(&name)
    }

    pub fn not_found(&self) -> AppError {
        AppError::NotFound(format!("{} not found", self.display))
    }
}

const TEN_DIGITS: &str = "^[0-9]{10}$";
const IFSC: &str = "^[A-Z]{4}0[A-Z0-9]{6}$";
const GSTIN: &str = "^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$";

static USER: EntityDef = EntityDef {
    path: "user",
    table: "users",
    response_key: "user",
    display: "User",
    columns: &[
        column("username", ColumnType::Text),
        column("password", ColumnType::Text),
        unique_column("email", ColumnType::Text),
        column("mobile_number", ColumnType::Text),
        defaulted_column("is_active", ColumnType::Boolean, "TRUE"),
    ],
    sensitive: &["password"],
    rules: &[
        FieldRule {
            field: "username",
            required: true,
            kind: RuleKind::Text { min: 3, max: 30 },
        },
        FieldRule {
            field: "password",
            required: true,
            kind: RuleKind::Text { min: 6, max: 128 },
        },
        FieldRule {
            field: "email",
            required: true,
            kind: RuleKind::Email,
        },
        FieldRule {
            field: "mobileNumber",
            required: true,
            kind: RuleKind::Pattern {
                pattern: TEN_DIGITS,
                hint: "must be a 10-digit mobile number",
            },
        },
        FieldRule {
            field: "isActive",
            required: false,
            kind: RuleKind::Boolean,
        },
    ],
    prepare: Some(password::hash_password_field),
};

static CLIENT: EntityDef = EntityDef {
    path: "client",
    table: "clients",
    response_key: "client",
    display: "Client",
    columns: &[
        column("name", ColumnType::Text),
        column("email", ColumnType::Text),
        column("address", ColumnType::Text),
        column("mobile_number", ColumnType::Text),
        nullable_column("gstin", ColumnType::Text),
    ],
    sensitive: &[],
    rules: &[
        FieldRule {
            field: "name",
            required: true,
            kind: RuleKind::Text { min: 1, max: 100 },
        },
        FieldRule {
            field: "email",
            required: true,
            kind: RuleKind::Email,
        },
        FieldRule {
            field: "address",
            required: true,
            kind: RuleKind::Text { min: 1, max: 200 },
        },
        FieldRule {
            field: "mobileNumber",
            required: true,
            kind: RuleKind::Pattern {
                pattern: TEN_DIGITS,
                hint: "must be a 10-digit mobile number",
            },
        },
        FieldRule {
            field: "gstin",
            required: false,
            kind: RuleKind::Pattern {
                pattern: GSTIN,
                hint: "must be a valid 15-character GSTIN",
            },
        },
    ],
    prepare: None,
};

static BANK_DETAILS: EntityDef = EntityDef {
    path: "bankDetails",
    table: "bank_details",
    response_key: "bankDetails",
    display: "Bank details",
    columns: &[
        column("account_number", ColumnType::Text),
        column("ifsc", ColumnType::Text),
        column("bank_name", ColumnType::Text),
        fk_column("user_id", "users"),
    ],
    sensitive: &[],
    rules: &[
        FieldRule {
            field: "accountNumber",
            required: true,
            kind: RuleKind::Text { min: 10, max: 20 },
        },
        FieldRule {
            field: "ifsc",
            required: true,
            kind: RuleKind::Pattern {
                pattern: IFSC,
                hint: "must be a valid IFSC code",
            },
        },
        FieldRule {
            field: "bankName",
            required: true,
            kind: RuleKind::Text { min: 3, max: 50 },
        },
        FieldRule {
            field: "userId",
            required: true,
            kind: RuleKind::Integer { positive: true },
        },
    ],
    prepare: None,
};

static INVOICE: EntityDef = EntityDef {
    path: "Invoice",
    table: "invoices",
    response_key: "invoice",
    display: "Invoice",
    columns: &[
        column("invoice_number", ColumnType::Text),
        column("due_date", ColumnType::Text),
        fk_column("client_id", "clients"),
    ],
    sensitive: &[],
    rules: &[
        FieldRule {
            field: "invoiceNumber",
            required: true,
            kind: RuleKind::Text { min: 1, max: 50 },
        },
        FieldRule {
            field: "dueDate",
            required: true,
            kind: RuleKind::Date,
        },
        FieldRule {
            field: "clientId",
            required: true,
            kind: RuleKind::Integer { positive: false },
        },
    ],
    prepare: None,
};

static ITEMS_DETAILS: EntityDef = EntityDef {
    path: "itemsDetails",
    table: "items_details",
    response_key: "itemsDetails",
    display: "Items details",
    columns: &[
        column("items_name", ColumnType::Text),
        column("quantity", ColumnType::BigInt),
        column("rate", ColumnType::Double),
        fk_column("invoice_id", "invoices"),
    ],
    sensitive: &[],
    rules: &[
        FieldRule {
            field: "itemsName",
            required: true,
            kind: RuleKind::Text { min: 1, max: 100 },
        },
        FieldRule {
            field: "quantity",
            required: true,
            kind: RuleKind::Integer { positive: true },
        },
        FieldRule {
            field: "rate",
            required: true,
            kind: RuleKind::Number { positive: true },
        },
        FieldRule {
            field: "invoiceId",
            required: true,
            kind: RuleKind::Integer { positive: false },
        },
    ],
    prepare: None,
};

static USER_CLIENT_RELATIONS: EntityDef = EntityDef {
    path: "userClientRelations",
    table: "user_client_relations",
    response_key: "userClientRelations",
    display: "User-client relation",
    columns: &[
        fk_column("user_id", "users"),
        fk_column("client_id", "clients"),
    ],
    sensitive: &[],
    rules: &[
        FieldRule {
            field: "userId",
            required: true,
            kind: RuleKind::Integer { positive: true },
        },
        FieldRule {
            field: "clientId",
            required: true,
            kind: RuleKind::Integer { positive: true },
        },
    ],
    prepare: None,
};

/// All entities, in foreign-key dependency order (migrations run in this
/// order).
pub static ENTITIES: &[&EntityDef] = &[
    &USER,
    &CLIENT,
    &BANK_DETAILS,
    &INVOICE,
    &ITEMS_DETAILS,
    &USER_CLIENT_RELATIONS,
];

pub fn by_path(segment: &str) -> Option<&'static EntityDef> {
    ENTITIES.iter().find(|e| e.path == segment).copied()
}
