//! Validation gate.
//!
//! [`validated`] is a route middleware: it maps the JSON body onto `T`, runs
//! the declarative `validator` rules and either answers 400 with a flat list
//! of messages or forwards the normalized body to the next handler.

use crate::error::ApiError;
use crate::routing::{middleware, Middleware};
use crate::state::AppState;
use crate::MAX_BODY_SIZE;
use axum::{
    body::Body,
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue,
    },
    middleware::Next,
    response::IntoResponse,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Gate a route on `T`'s validation rules.
pub fn validated<T>() -> Middleware
where
    T: DeserializeOwned + Serialize + Validate + Send + 'static,
{
    middleware(
        |_state: AppState, request: Request, next: Next| async move {
            match normalize::<T>(request).await {
                Ok(request) => next.run(request).await,
                Err(err) => err.into_response(),
            }
        },
    )
}

async fn normalize<T>(request: Request) -> Result<Request, ApiError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let (mut parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // An absent body validates like `{}` so missing fields are reported.
    let value: Value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let input: T = serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    input
        .validate()
        .map_err(|e| ApiError::Validation(flatten_errors(&e)))?;

    let normalized = serde_json::to_vec(&input).map_err(|e| ApiError::Internal(e.to_string()))?;
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    parts.headers.remove(CONTENT_LENGTH);

    Ok(Request::from_parts(parts, Body::from(normalized)))
}

/// Flatten possibly nested validation errors depth-first into readable
/// messages. Keys are visited in sorted order; nested fields are reported
/// with their full path (`produtos.0.quantidade`).
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    let sorted: BTreeMap<String, &ValidationErrorsKind> = errors
        .errors()
        .iter()
        .map(|(field, kind)| (field.to_string(), kind))
        .collect();

    for (field, kind) in sorted {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|err| describe(&path, err)));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}.{index}"), out);
                }
            }
        }
    }
}

/// Attach the failures of a list of nested values under `field`
pub fn nest_list<T: Validate>(errors: &mut ValidationErrors, field: &'static str, items: &[T]) {
    let failed: BTreeMap<usize, Box<ValidationErrors>> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| item.validate().err().map(|e| (index, Box::new(e))))
        .collect();

    if !failed.is_empty() {
        errors
            .errors_mut()
            .insert(field.into(), ValidationErrorsKind::List(failed));
    }
}

/// Human-readable message for one failed rule
pub fn describe(field: &str, err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }

    let param = |name: &str| err.params.get(name).map(|v| v.to_string());
    match err.code.as_ref() {
        "required" => format!("{field} should not be empty"),
        "length" => match (param("equal"), param("min"), param("max")) {
            (Some(n), _, _) => format!("{field} must be exactly {n} characters long"),
            (None, Some(min), Some(max)) if min == max => {
                format!("{field} must be exactly {min} characters long")
            }
            (None, Some(min), Some(max)) => format!(
                "{field} must be longer than or equal to {min} and shorter than or equal to {max} characters"
            ),
            (None, Some(min), None) => {
                format!("{field} must be longer than or equal to {min} characters")
            }
            (None, None, Some(max)) => {
                format!("{field} must be shorter than or equal to {max} characters")
            }
            (None, None, None) => format!("{field} has an invalid length"),
        },
        "email" => format!("{field} must be an email"),
        "range" => match (param("min"), param("max")) {
            (Some(min), _) if err.params.get("value").is_some_and(|v| below(v, &min)) => {
                format!("{field} must not be less than {min}")
            }
            (_, Some(max)) => format!("{field} must not be greater than {max}"),
            (Some(min), None) => format!("{field} must not be less than {min}"),
            (None, None) => format!("{field} is out of range"),
        },
        _ => format!("{field} is invalid"),
    }
}

fn below(value: &Value, min: &str) -> bool {
    match (value.as_f64(), min.parse::<f64>()) {
        (Some(v), Ok(m)) => v < m,
        _ => false,
    }
}

/// Custom field rules shared by the entity definitions
pub mod rules {
    use chrono::{DateTime, NaiveDate};
    use regex::Regex;
    use std::borrow::Cow;
    use std::sync::LazyLock;
    use validator::ValidationError;

    static CPF_CNPJ: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(\d{11}|\d{14}|\d{3}\.\d{3}\.\d{3}-\d{2}|\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2})$")
            .expect("valid regex")
    });
    static CEP: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("valid regex"));
    static PHONE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\(?\d{2}\)?\s?\d{4,5}-?\d{4}$").expect("valid regex"));

    fn fail(code: &'static str, message: &'static str) -> ValidationError {
        ValidationError::new(code).with_message(Cow::Borrowed(message))
    }

    pub fn cpf_cnpj(value: &str) -> Result<(), ValidationError> {
        if CPF_CNPJ.is_match(value) {
            Ok(())
        } else {
            Err(fail("cpf_cnpj", "CPF ou CNPJ inválido"))
        }
    }

    pub fn cep(value: &str) -> Result<(), ValidationError> {
        if CEP.is_match(value) {
            Ok(())
        } else {
            Err(fail("cep", "CEP inválido"))
        }
    }

    pub fn telefone(value: &str) -> Result<(), ValidationError> {
        if PHONE.is_match(value) {
            Ok(())
        } else {
            Err(fail("telefone", "Telefone inválido"))
        }
    }

    pub fn telefone_fax(value: &str) -> Result<(), ValidationError> {
        if PHONE.is_match(value) {
            Ok(())
        } else {
            Err(fail("telefone_fax", "Telefone fax inválido"))
        }
    }

    /// `YYYY-MM-DD` or a full RFC 3339 timestamp
    pub fn date(value: &str) -> Result<(), ValidationError> {
        if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            || DateTime::parse_from_rfc3339(value).is_ok()
        {
            Ok(())
        } else {
            Err(fail("date", "Data inválida"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct Item {
        #[validate(required, range(min = 1))]
        quantidade: Option<i64>,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Form {
        #[validate(required, length(min = 1, max = 5))]
        nome: Option<String>,
        #[validate(email)]
        email: Option<String>,
        #[validate(length(equal = 2))]
        uf: Option<String>,
        #[validate(nested)]
        itens: Vec<Item>,
    }

    fn form(value: serde_json::Value) -> Form {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn required_field_message() {
        let errors = form(serde_json::json!({"itens": []})).validate().unwrap_err();
        assert_eq!(flatten_errors(&errors), vec!["nome should not be empty"]);
    }

    #[test]
    fn messages_are_sorted_by_field() {
        let errors = form(serde_json::json!({
            "nome": "muito longo",
            "email": "nope",
            "uf": "SPX",
            "itens": []
        }))
        .validate()
        .unwrap_err();

        let messages = flatten_errors(&errors);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], "email must be an email");
        assert!(messages[1].starts_with("nome must be longer than or equal to 1"));
        assert_eq!(messages[2], "uf must be exactly 2 characters long");
    }

    #[test]
    fn nested_list_errors_are_flattened_with_path() {
        let errors = form(serde_json::json!({
            "nome": "ok",
            "itens": [{"quantidade": 2}, {"quantidade": 0}, {}]
        }))
        .validate()
        .unwrap_err();

        let messages = flatten_errors(&errors);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("itens.1.quantidade must not be less than"));
        assert_eq!(messages[1], "itens.2.quantidade should not be empty");
    }

    #[test]
    fn custom_rules() {
        assert!(rules::cpf_cnpj("12345678901").is_ok());
        assert!(rules::cpf_cnpj("12.345.678/0001-90").is_ok());
        assert!(rules::cpf_cnpj("123").is_err());
        assert_eq!(
            rules::cpf_cnpj("abc").unwrap_err().message.unwrap(),
            "CPF ou CNPJ inválido"
        );

        assert!(rules::cep("01310-100").is_ok());
        assert!(rules::cep("01310100").is_ok());
        assert!(rules::cep("0131").is_err());

        assert!(rules::telefone("(11) 91234-5678").is_ok());
        assert!(rules::telefone("1134567890").is_ok());
        assert!(rules::telefone("12").is_err());

        assert!(rules::date("2024-03-01").is_ok());
        assert!(rules::date("2024-03-01T10:00:00Z").is_ok());
        assert!(rules::date("01/03/2024").is_err());
    }
}
