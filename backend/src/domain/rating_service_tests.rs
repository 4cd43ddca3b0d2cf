//! Tests for the rating service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockProviderRepository, MockRequesterRepository, MockReviewRepository, ReviewRepositoryError,
};
use crate::domain::{ErrorCode, Provider, Requester};

type Service = RatingService<MockProviderRepository, MockRequesterRepository, MockReviewRepository>;

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

fn ratings(values: &[u8]) -> Vec<RatingValue> {
    values
        .iter()
        .map(|value| RatingValue::new(*value).expect("valid rating"))
        .collect()
}

fn provider_with_revision(id: ProviderId, revision: u32) -> Provider {
    let mut provider = Provider::new(id);
    provider.rating_revision = revision;
    provider
}

fn known_requester() -> MockRequesterRepository {
    let mut requesters = MockRequesterRepository::new();
    requesters
        .expect_find_by_id()
        .returning(|id| Ok(Some(Requester::new(*id, "Grace"))));
    requesters
}

fn make_service(
    providers: MockProviderRepository,
    requesters: MockRequesterRepository,
    reviews: MockReviewRepository,
) -> Service {
    RatingService::new(
        Arc::new(providers),
        Arc::new(requesters),
        Arc::new(reviews),
        Arc::new(FixtureClock),
    )
}

fn request(provider_id: ProviderId, rating: f64) -> SubmitRatingRequest {
    SubmitRatingRequest {
        requester_id: RequesterId::random(),
        provider_id,
        rating,
    }
}

#[rstest]
#[case(0.0)]
#[case(6.0)]
#[case(3.5)]
#[case(f64::NAN)]
#[tokio::test]
async fn invalid_ratings_are_rejected_before_touching_the_store(#[case] rating: f64) {
    let service = make_service(
        MockProviderRepository::new(),
        MockRequesterRepository::new(),
        MockReviewRepository::new(),
    );

    let error = service
        .submit_rating(request(ProviderId::random(), rating))
        .await
        .expect_err("rating rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRating);
}

#[tokio::test]
async fn unknown_provider_is_reported() {
    let mut providers = MockProviderRepository::new();
    providers.expect_find_by_id().times(1).return_once(|_| Ok(None));
    let service = make_service(providers, MockRequesterRepository::new(), MockReviewRepository::new());

    let error = service
        .submit_rating(request(ProviderId::random(), 4.0))
        .await
        .expect_err("provider missing");

    assert_eq!(error.code(), ErrorCode::ProviderNotFound);
}

#[tokio::test]
async fn unknown_requester_is_reported() {
    let provider_id = ProviderId::random();
    let mut providers = MockProviderRepository::new();
    providers
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(Provider::new(provider_id))));
    let mut requesters = MockRequesterRepository::new();
    requesters.expect_find_by_id().times(1).return_once(|_| Ok(None));
    let service = make_service(providers, requesters, MockReviewRepository::new());

    let error = service
        .submit_rating(request(provider_id, 4.0))
        .await
        .expect_err("requester missing");

    assert_eq!(error.code(), ErrorCode::RequesterNotFound);
}

#[tokio::test]
async fn submission_upserts_review_and_writes_the_full_mean() {
    let provider_id = ProviderId::random();
    let mut providers = MockProviderRepository::new();
    providers
        .expect_find_by_id()
        .times(2)
        .returning(move |_| Ok(Some(provider_with_revision(provider_id, 7))));
    providers
        .expect_save_rating()
        .withf(move |id, rating, expected| {
            *id == provider_id && (*rating - 13.0 / 3.0).abs() < 1e-12 && *expected == 7
        })
        .times(1)
        .return_once(|_, _, _| Ok(8));
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_upsert()
        .withf(|review| review.rating.get() == 4 && review.created_at == FixtureClock.utc())
        .times(1)
        .return_once(|_| Ok(()));
    reviews
        .expect_ratings_for_provider()
        .times(1)
        .return_once(|_| Ok(ratings(&[5, 4, 4])));
    let service = make_service(providers, known_requester(), reviews);

    let outcome = service
        .submit_rating(request(provider_id, 4.0))
        .await
        .expect("submission succeeds");

    assert_eq!(outcome.average_rating, 4.3);
    assert_eq!(outcome.review_count, 3);
    assert_eq!(outcome.provider_id, provider_id);
}

#[tokio::test]
async fn revision_conflicts_trigger_a_fresh_recompute() {
    let provider_id = ProviderId::random();
    let mut providers = MockProviderRepository::new();
    let mut revisions = vec![2, 1, 1].into_iter();
    providers
        .expect_find_by_id()
        .times(3)
        .returning(move |_| {
            let revision = revisions.next().expect("revision sequence");
            Ok(Some(provider_with_revision(provider_id, revision)))
        });
    let mut outcomes = vec![
        Err(ProviderRepositoryError::revision_mismatch(1_u32, 2_u32)),
        Ok(3),
    ]
    .into_iter();
    providers
        .expect_save_rating()
        .times(2)
        .returning(move |_, _, _| outcomes.next().expect("save outcome sequence"));
    let mut reviews = MockReviewRepository::new();
    reviews.expect_upsert().times(1).return_once(|_| Ok(()));
    let mut snapshots = vec![ratings(&[4]), ratings(&[4, 2])].into_iter();
    reviews
        .expect_ratings_for_provider()
        .times(2)
        .returning(move |_| Ok(snapshots.next().expect("ratings sequence")));
    let service = make_service(providers, known_requester(), reviews);

    let outcome = service
        .submit_rating(request(provider_id, 2.0))
        .await
        .expect("submission succeeds after retry");

    assert_eq!(outcome.average_rating, 3.0);
    assert_eq!(outcome.review_count, 2);
}

#[tokio::test]
async fn exhausted_retries_surface_a_conflict() {
    let provider_id = ProviderId::random();
    let mut providers = MockProviderRepository::new();
    providers
        .expect_find_by_id()
        .times(3)
        .returning(move |_| Ok(Some(provider_with_revision(provider_id, 1))));
    providers
        .expect_save_rating()
        .times(2)
        .returning(|_, _, _| Err(ProviderRepositoryError::revision_mismatch(1_u32, 9_u32)));
    let mut reviews = MockReviewRepository::new();
    reviews.expect_upsert().times(1).return_once(|_| Ok(()));
    reviews
        .expect_ratings_for_provider()
        .times(2)
        .returning(|_| Ok(ratings(&[3])));
    let service = make_service(providers, known_requester(), reviews).with_max_attempts(2);

    let error = service
        .submit_rating(request(provider_id, 3.0))
        .await
        .expect_err("retries exhausted");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert!(!error.code().is_caller_fault());
}

#[tokio::test]
async fn review_store_failures_surface_as_store_unavailable() {
    let provider_id = ProviderId::random();
    let mut providers = MockProviderRepository::new();
    providers
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(Provider::new(provider_id))));
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_upsert()
        .times(1)
        .return_once(|_| Err(ReviewRepositoryError::connection("refused")));
    let service = make_service(providers, known_requester(), reviews);

    let error = service
        .submit_rating(request(provider_id, 5.0))
        .await
        .expect_err("store failure surfaces");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
}
