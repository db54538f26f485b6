use crate::domain::book::Category;
use crate::validation::{FieldSpec, FieldType, Rule, Schema};

pub static CREATE_BOOK: Schema = Schema::new(
    "createBook",
    &[
        FieldSpec::new("title", FieldType::Str)
            .required()
            .rules(&[Rule::MinLen(3)]),
        FieldSpec::new("authorName", FieldType::Str)
            .alias("author")
            .required()
            .rules(&[Rule::MinLen(3)]),
        FieldSpec::new("authorEmail", FieldType::Str)
            .required()
            .rules(&[Rule::Email]),
        FieldSpec::new("price", FieldType::Int).rules(&[Rule::Positive]),
        FieldSpec::new("cover", FieldType::Str),
        FieldSpec::new("category", FieldType::Str).rules(&[Rule::OneOf(&Category::NAMES)]),
        FieldSpec::new("featured", FieldType::Bool),
    ],
);

pub static UPDATE_BOOK: Schema = Schema::new(
    "updateBook",
    &[
        FieldSpec::new("title", FieldType::Str).rules(&[Rule::MinLen(3)]),
        FieldSpec::new("authorName", FieldType::Str)
            .alias("author")
            .rules(&[Rule::MinLen(3)]),
        FieldSpec::new("authorEmail", FieldType::Str).rules(&[Rule::Email]),
        FieldSpec::new("authorId", FieldType::Int).rules(&[Rule::Positive]),
        FieldSpec::new("price", FieldType::Int).rules(&[Rule::Positive]),
        FieldSpec::new("cover", FieldType::Str),
        FieldSpec::new("category", FieldType::Str).rules(&[Rule::OneOf(&Category::NAMES)]),
        FieldSpec::new("featured", FieldType::Bool),
    ],
);

pub static CREATE_USER: Schema = Schema::new(
    "createUser",
    &[
        FieldSpec::new("email", FieldType::Str)
            .required()
            .rules(&[Rule::Email]),
        FieldSpec::new("name", FieldType::Str)
            .required()
            .rules(&[Rule::MinLen(3)]),
        FieldSpec::new("password", FieldType::Str)
            .required()
            .rules(&[Rule::MinLen(6)]),
    ],
);

pub static UPDATE_USER: Schema = Schema::new(
    "updateUser",
    &[
        FieldSpec::new("email", FieldType::Str).rules(&[Rule::Email]),
        FieldSpec::new("name", FieldType::Str).rules(&[Rule::MinLen(3)]),
        FieldSpec::new("password", FieldType::Str).rules(&[Rule::MinLen(6)]),
    ],
);

pub static LOGIN: Schema = Schema::new(
    "login",
    &[
        FieldSpec::new("email", FieldType::Str)
            .required()
            .rules(&[Rule::Email]),
        FieldSpec::new("password", FieldType::Str).required(),
    ],
);
