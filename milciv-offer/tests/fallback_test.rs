//! Fallback behaviour of `OfferParser` with stub primary extractors.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use milciv_offer::{
    ExtractionError, ExtractionMethod, OfferExtractor, OfferParser, OfferTerms, PatternExtractor,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const OFFER: &str = "Base Salary: $132,000. Signing bonus: $8,000. Join our startup!";

enum Behaviour {
    Succeed,
    Fail,
    Hang,
}

struct StubExtractor {
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
}

impl StubExtractor {
    fn boxed(behaviour: Behaviour) -> (Box<dyn OfferExtractor>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = StubExtractor {
            behaviour,
            calls: Arc::clone(&calls),
        };
        (Box::new(stub), calls)
    }
}

#[async_trait]
impl OfferExtractor for StubExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Assisted
    }

    async fn extract(&self, _text: &str) -> Result<OfferTerms, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Succeed => Ok(OfferTerms {
                base_salary: dec!(140000),
                confidence: dec!(0.9),
                ..OfferTerms::empty(ExtractionMethod::Assisted)
            }),
            Behaviour::Fail => Err(ExtractionError::EmptyContent),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Err(ExtractionError::EmptyContent)
            }
        }
    }
}

fn parser(primary: Box<dyn OfferExtractor>) -> OfferParser {
    OfferParser::with_primary(primary, PatternExtractor::default(), Duration::from_millis(50))
}

#[tokio::test]
async fn test_primary_result_is_used_when_it_succeeds() {
    let (stub, calls) = StubExtractor::boxed(Behaviour::Succeed);

    let terms = parser(stub).parse(OFFER).await;

    assert_eq!(terms.method, ExtractionMethod::Assisted);
    assert_eq!(terms.base_salary, dec!(140000));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_error_falls_back_after_one_attempt() {
    let (stub, calls) = StubExtractor::boxed(Behaviour::Fail);

    let terms = parser(stub).parse(OFFER).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(terms.method, ExtractionMethod::Pattern);
    assert_eq!(terms.base_salary, dec!(132000));
    assert_eq!(terms.sign_on_bonus, dec!(8000));
    assert!(!terms.is_public_company);
    assert!(terms.is_low_confidence());
}

#[tokio::test]
async fn test_timeout_falls_back_without_waiting() {
    let (stub, calls) = StubExtractor::boxed(Behaviour::Hang);
    let started = std::time::Instant::now();

    let terms = parser(stub).parse(OFFER).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(terms.method, ExtractionMethod::Pattern);
    assert_eq!(terms.base_salary, dec!(132000));
}

#[tokio::test]
async fn test_garbage_text_never_errors() {
    let (stub, _) = StubExtractor::boxed(Behaviour::Fail);

    let terms = parser(stub).parse("\u{0}\u{1}%%% $$$ ,,,").await;

    assert_eq!(terms, OfferTerms::empty(ExtractionMethod::Pattern));
}
