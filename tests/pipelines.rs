//! End to end behaviour of the fail-fast and accumulating pipelines.

use std::cell::{Cell, RefCell};

use forkpath::failure::{NullSink, RecordingSink};
use forkpath::prelude::*;
use futures::FutureExt;

forkpath::failure_codes! {
    pub enum SignupCode {
        Taken => "taken",
        Invalid => "invalid",
        Storage => "storage",
    }
}

forkpath::keys! {
    Email => "email",
    NewAccount => "account",
    Welcome => "welcome",
}

#[derive(Debug, Clone, PartialEq)]
struct Account {
    id: u32,
    email: String,
}

type SignupFailure = Failure<SignupCode, String>;

fn init() {
    let _ = pretty_env_logger::try_init();
}

fn quiet() -> Diagnostics<NullSink> {
    Diagnostics::new(NullSink).trace_mode(TraceMode::Off)
}

fn parse_email(raw: &str) -> Either<SignupFailure, String> {
    if raw.contains('@') {
        right(raw.to_lowercase())
    } else {
        left(
            quiet()
                .fail(SignupCode::Invalid)
                .message("email needs an @")
                .body(raw.to_string())
                .finish(),
        )
    }
}

async fn create_account(email: &str, taken: &[&str]) -> Either<SignupFailure, Account> {
    if taken.iter().any(|t| *t == email) {
        left(quiet().fail(SignupCode::Taken).message(email).finish())
    } else {
        right(Account {
            id: 7,
            email: email.to_string(),
        })
    }
}

#[tokio::test]
async fn signup_builds_every_field() {
    init();

    let out = empty::<SignupCode, String>()
        .bind_flat(Email, |_| parse_email("Ada@Example.com"))
        .bind(NewAccount, |ns| {
            create_account(ns.get(Email), &["bob@example.com"]).boxed_local()
        })
        .bind_flat(Welcome, |ns| right(format!("hello #{}", ns.get(NewAccount).id)))
        .finish(|ns| (ns.get(NewAccount).clone(), ns.take(Welcome)))
        .await;

    assert_eq!(
        out,
        right((
            Account {
                id: 7,
                email: "ada@example.com".to_string()
            },
            "hello #7".to_string()
        ))
    );
}

#[tokio::test]
async fn signup_stops_at_first_failure() {
    init();

    let welcomed = Cell::new(0);

    let out = empty::<SignupCode, String>()
        .bind_flat(Email, |_| parse_email("bob@example.com"))
        .bind(NewAccount, |ns| {
            create_account(ns.get(Email), &["bob@example.com"]).boxed_local()
        })
        .bind_flat(Welcome, |_| {
            welcomed.set(welcomed.get() + 1);
            right("never")
        })
        .finish(|ns| ns.take(Welcome))
        .await;

    assert_eq!(welcomed.get(), 0);
    match out {
        Left(f) => {
            assert_eq!(*f.code(), SignupCode::Taken);
            assert_eq!(f.message(), Some("bob@example.com"));
        }
        Right(_) => panic!("signup should fail for a taken email"),
    }
}

#[tokio::test]
async fn async_chain_respects_order_and_short_circuit() {
    let log = RefCell::new(Vec::new());

    let out = right::<&str, _>(2)
        .chain_async(|n| {
            log.borrow_mut().push("double");
            async move { right(n * 2) }
        })
        .await
        .chain_async(|_| async { left::<_, i32>("stop") })
        .await
        .map_async(|n| {
            log.borrow_mut().push("after stop");
            async move { n + 1 }
        })
        .await;

    assert_eq!(out, left("stop"));
    assert_eq!(*log.borrow(), vec!["double"]);
}

#[test]
fn validation_collects_every_problem() {
    let checks = |email: &String| -> Must<&'static str, String> {
        Must::new(email.clone())
            .chain(|e| {
                if e.contains('@') {
                    right(e.clone())
                } else {
                    left("missing @")
                }
            })
            .chain(|e| {
                if e.len() <= 8 {
                    right(e.clone())
                } else {
                    left("too long")
                }
            })
    };

    let out = Must::<&'static str, _>::new("someone.example".to_string()).chain(checks);

    assert_eq!(out.errors(), &["missing @", "too long"]);
    assert_eq!(out.get(), "someone.example");

    let recovered = out.chain_left(|es| {
        if es.contains(&"too long") {
            right("anon@x".to_string())
        } else {
            left("unrecoverable")
        }
    });

    assert_eq!(recovered.into_either(), right("anon@x".to_string()));
}

#[test]
fn bridge_between_models() {
    let parsed: Vec<Either<&str, u8>> = ["1", "x", "3"]
        .iter()
        .map(|s| Either::from(s.parse::<u8>()).map_left(|_| "not a number"))
        .collect();

    assert_eq!(all(parsed.clone()), left("not a number"));

    let total = parsed
        .into_iter()
        .fold(Must::new(0u32), |acc, e| {
            acc.chain(|sum| e.map(|n| sum + n as u32).into_must(*sum))
        });

    assert_eq!(*total.get(), 4);
    assert_eq!(total.errors(), &["not a number"]);
}

#[test]
fn diagnostics_are_written_when_failures_are_built() {
    init();

    let diag = Diagnostics::new(RecordingSink::new()).trace_mode(TraceMode::Off);

    let failures: Vec<Failure<SignupCode>> = vec![
        diag.fail(SignupCode::Storage).log("disk full on /var").finish(),
        diag.fail(SignupCode::Invalid).finish(),
        diag.fail(SignupCode::Storage).log("retry budget spent").finish(),
    ];

    assert_eq!(failures.len(), 3);
    assert_eq!(
        diag.sink().lines(),
        vec!["disk full on /var".to_string(), "retry budget spent".to_string()]
    );

    // default diagnostics report through the log facade
    let logged: Failure<SignupCode> = fail(SignupCode::Storage).log("via log").finish();
    assert_eq!(logged.to_string(), "storage");
}

#[test]
fn maybe_values() {
    assert!(from_nullable::<i32>(None).is_left());
    assert_eq!(from_nullable(Some(5)).or_else(|_| -1), 5);
    assert_eq!(some(1).chain(|_| none::<i32>()), none());
}
