//! Tests for candidate ranking and the search fallback.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockProviderRepository, ProviderRepositoryError};
use crate::domain::{ErrorCode, ProviderId, SearchText};

fn point(lng: f64, lat: f64) -> GeoPoint {
    GeoPoint::new(lng, lat).expect("valid point")
}

fn provider_at(name: &str, location: Option<GeoPoint>) -> Provider {
    let mut provider = Provider::new(ProviderId::random());
    name.clone_into(&mut provider.name);
    "tutor".clone_into(&mut provider.category);
    provider.location = location;
    provider
}

fn engine_returning(candidates: Vec<Provider>) -> ProximityEngine<MockProviderRepository> {
    let mut repo = MockProviderRepository::new();
    repo.expect_find_in_bounds()
        .times(1)
        .return_once(move |_, _| Ok(candidates));
    ProximityEngine::new(Arc::new(repo))
}

fn names(ranked: &[RankedProvider]) -> Vec<&str> {
    ranked
        .iter()
        .map(|entry| entry.provider.name.as_str())
        .collect()
}

#[tokio::test]
async fn results_are_ordered_nearest_first() {
    let engine = engine_returning(vec![
        provider_at("far", Some(point(0.0, 0.03))),
        provider_at("near", Some(point(0.0, 0.01))),
        provider_at("middle", Some(point(0.0, 0.02))),
    ]);

    let ranked = engine
        .find_near(point(0.0, 0.0), SearchRadius::default(), &ProviderFilter::available())
        .await
        .expect("query succeeds");

    assert_eq!(names(&ranked), ["near", "middle", "far"]);
    let distances: Vec<f64> = ranked
        .iter()
        .map(|entry| entry.distance_meters.expect("proximity results carry distance"))
        .collect();
    assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[tokio::test]
async fn providers_beyond_the_radius_or_without_location_are_dropped() {
    let engine = engine_returning(vec![
        provider_at("inside", Some(point(0.0, 0.05))),
        provider_at("outside", Some(point(0.0, 0.2))),
        provider_at("nowhere", None),
    ]);

    let ranked = engine
        .find_near(point(0.0, 0.0), SearchRadius::default(), &ProviderFilter::available())
        .await
        .expect("query succeeds");

    assert_eq!(names(&ranked), ["inside"]);
}

#[tokio::test]
async fn unavailable_providers_never_surface() {
    let mut hidden = provider_at("hidden", Some(point(0.0, 0.0)));
    hidden.availability = false;
    let engine = engine_returning(vec![hidden, provider_at("shown", Some(point(0.0, 0.01)))]);

    let ranked = engine
        .find_near(point(0.0, 0.0), SearchRadius::default(), &ProviderFilter::available())
        .await
        .expect("query succeeds");

    assert_eq!(names(&ranked), ["shown"]);
}

#[tokio::test]
async fn a_provider_exactly_on_the_radius_is_included() {
    let origin = point(-3.19, 55.95);
    let edge = point(-3.15, 55.97);
    let radius = SearchRadius::from_meters(origin.distance_meters(&edge)).expect("radius");
    let engine = engine_returning(vec![provider_at("edge", Some(edge))]);

    let ranked = engine
        .find_near(origin, radius, &ProviderFilter::available())
        .await
        .expect("query succeeds");

    assert_eq!(names(&ranked), ["edge"]);
}

#[tokio::test]
async fn equidistant_providers_keep_store_order() {
    let engine = engine_returning(vec![
        provider_at("east", Some(point(0.01, 0.0))),
        provider_at("west", Some(point(-0.01, 0.0))),
    ]);

    let ranked = engine
        .find_near(point(0.0, 0.0), SearchRadius::default(), &ProviderFilter::available())
        .await
        .expect("query succeeds");

    assert_eq!(names(&ranked), ["east", "west"]);
}

#[tokio::test]
async fn bounding_box_passed_to_the_store_covers_the_radius() {
    let origin = point(0.0, 0.0);
    let mut repo = MockProviderRepository::new();
    repo.expect_find_in_bounds()
        .withf(move |bounds, _| bounds.contains(&point(0.0, 0.089)) && !bounds.contains(&point(0.0, 0.1)))
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));
    let engine = ProximityEngine::new(Arc::new(repo));

    let ranked = engine
        .find_near(origin, SearchRadius::default(), &ProviderFilter::available())
        .await
        .expect("query succeeds");

    assert!(ranked.is_empty());
}

#[tokio::test]
async fn search_without_origin_falls_back_to_text_matches() {
    let mut repo = MockProviderRepository::new();
    repo.expect_list_matching()
        .withf(|filter| filter.text.as_ref().map(SearchText::as_str) == Some("tutor"))
        .times(1)
        .return_once(|_| Ok(vec![provider_at("Ada", None), provider_at("Grace", Some(point(50.0, 10.0)))]));
    let engine = ProximityEngine::new(Arc::new(repo));
    let filter = ProviderFilter::available().with_text(SearchText::parse("tutor").expect("query"));

    let ranked = engine
        .search(None, SearchRadius::default(), &filter)
        .await
        .expect("fallback succeeds");

    assert_eq!(names(&ranked), ["Ada", "Grace"]);
    assert!(ranked.iter().all(|entry| entry.distance_meters.is_none()));
}

#[tokio::test]
async fn search_without_origin_or_text_requires_a_location() {
    let engine = ProximityEngine::new(Arc::new(MockProviderRepository::new()));

    let error = engine
        .search(None, SearchRadius::default(), &ProviderFilter::available())
        .await
        .expect_err("location required");

    assert_eq!(error.code(), ErrorCode::LocationRequired);
}

#[rstest]
#[case(ProviderRepositoryError::connection("refused"))]
#[case(ProviderRepositoryError::query("timeout"))]
#[tokio::test]
async fn store_failures_are_not_reported_as_empty_results(#[case] failure: ProviderRepositoryError) {
    let mut repo = MockProviderRepository::new();
    repo.expect_find_in_bounds()
        .times(1)
        .return_once(move |_, _| Err(failure));
    let engine = ProximityEngine::new(Arc::new(repo));

    let error = engine
        .find_near(point(0.0, 0.0), SearchRadius::default(), &ProviderFilter::available())
        .await
        .expect_err("store failure surfaces");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
}
