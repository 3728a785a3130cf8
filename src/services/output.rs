use crate::catalog::CatalogLoadError;
use crate::domain::models::{ErrorBody, InvalidInput, JsonError, JsonOut};
use crate::services::engine::SessionError;
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    text: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", text(&data));
    }
    Ok(())
}

pub fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<CatalogLoadError>().is_some() {
        "CATALOG_LOAD"
    } else if err.downcast_ref::<SessionError>().is_some() {
        "SESSION"
    } else if err.downcast_ref::<InvalidInput>().is_some() {
        "INVALID_INPUT"
    } else {
        "INTERNAL"
    }
}

pub fn print_error(json: bool, err: &anyhow::Error) {
    if json {
        let body = JsonError {
            ok: false,
            error: ErrorBody {
                code: error_code(err),
                message: format!("{:#}", err),
            },
        };
        match serde_json::to_string_pretty(&body) {
            Ok(s) => println!("{}", s),
            Err(_) => eprintln!("error: {:#}", err),
        }
    } else {
        eprintln!("error: {:#}", err);
    }
}
