//! Position updates for requesters and providers.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, instrument};

use crate::domain::ports::{
    LocationCommand, ProviderLocationUpdated, ProviderRepository, RequesterRepository,
    SetProviderLocationRequest, SetRequesterLocationRequest,
};
use crate::domain::store_error_mapping::{map_provider_error, map_requester_error};
use crate::domain::{Error, GeoPoint, ProviderValidationError, RequesterId};

/// Location service implementing [`LocationCommand`].
#[derive(Clone)]
pub struct LocationService<P, Q> {
    providers: Arc<P>,
    requesters: Arc<Q>,
}

impl<P, Q> LocationService<P, Q> {
    /// Create a new service with the given repositories.
    pub fn new(providers: Arc<P>, requesters: Arc<Q>) -> Self {
        Self {
            providers,
            requesters,
        }
    }
}

fn parse_point(longitude: f64, latitude: f64) -> Result<GeoPoint, Error> {
    GeoPoint::new(longitude, latitude).map_err(|err| {
        Error::invalid_location(err.to_string())
            .with_details(json!({ "longitude": longitude, "latitude": latitude }))
    })
}

#[async_trait]
impl<P, Q> LocationCommand for LocationService<P, Q>
where
    P: ProviderRepository,
    Q: RequesterRepository,
{
    #[instrument(skip_all, fields(requester_id = %request.requester_id))]
    async fn set_requester_location(
        &self,
        request: SetRequesterLocationRequest,
    ) -> Result<GeoPoint, Error> {
        let point = parse_point(request.longitude, request.latitude)?;
        self.requesters
            .save_position(&request.requester_id, point)
            .await
            .map_err(map_requester_error)?;
        info!("requester location updated");
        Ok(point)
    }

    #[instrument(skip_all, fields(requester_id = %requester_id))]
    async fn requester_location(
        &self,
        requester_id: &RequesterId,
    ) -> Result<Option<GeoPoint>, Error> {
        self.requesters
            .find_by_id(requester_id)
            .await
            .map_err(map_requester_error)?
            .map(|requester| requester.position)
            .ok_or_else(|| Error::requester_not_found(format!("requester {requester_id} not found")))
    }

    #[instrument(skip_all, fields(provider_id = %request.provider_id))]
    async fn set_provider_location(
        &self,
        request: SetProviderLocationRequest,
    ) -> Result<ProviderLocationUpdated, Error> {
        let point = parse_point(request.longitude, request.latitude)?;
        let address = request.address.trim();
        if address.is_empty() {
            return Err(
                Error::invalid_request(ProviderValidationError::BlankAddress.to_string())
                    .with_details(json!({ "field": "address" })),
            );
        }

        let mut provider = self
            .providers
            .find_by_id(&request.provider_id)
            .await
            .map_err(map_provider_error)?
            .ok_or_else(|| {
                Error::provider_not_found(format!("provider {} not found", request.provider_id))
            })?;
        provider.location = Some(point);
        address.clone_into(&mut provider.address);
        self.providers
            .save_details(&provider)
            .await
            .map_err(map_provider_error)?;
        info!("provider location updated");

        Ok(ProviderLocationUpdated {
            location: point,
            address: provider.address,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockProviderRepository, MockRequesterRepository, RequesterRepositoryError,
    };
    use crate::domain::{ErrorCode, Provider, ProviderId, Requester};
    use rstest::rstest;

    type Service = LocationService<MockProviderRepository, MockRequesterRepository>;

    fn make_service(
        providers: MockProviderRepository,
        requesters: MockRequesterRepository,
    ) -> Service {
        LocationService::new(Arc::new(providers), Arc::new(requesters))
    }

    #[rstest]
    #[case(181.0, 0.0)]
    #[case(0.0, -91.0)]
    #[case(f64::NAN, 0.0)]
    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected(#[case] longitude: f64, #[case] latitude: f64) {
        let service = make_service(MockProviderRepository::new(), MockRequesterRepository::new());

        let error = service
            .set_requester_location(SetRequesterLocationRequest {
                requester_id: RequesterId::random(),
                latitude,
                longitude,
            })
            .await
            .expect_err("invalid location");

        assert_eq!(error.code(), ErrorCode::InvalidLocation);
    }

    #[tokio::test]
    async fn requester_location_is_saved() {
        let mut requesters = MockRequesterRepository::new();
        requesters
            .expect_save_position()
            .withf(|_, point| point.coordinates() == [-3.19, 55.95])
            .times(1)
            .return_once(|_, _| Ok(()));
        let service = make_service(MockProviderRepository::new(), requesters);

        let stored = service
            .set_requester_location(SetRequesterLocationRequest {
                requester_id: RequesterId::random(),
                latitude: 55.95,
                longitude: -3.19,
            })
            .await
            .expect("location saved");

        assert_eq!(stored.coordinates(), [-3.19, 55.95]);
    }

    #[tokio::test]
    async fn unknown_requester_cannot_save_a_location() {
        let mut requesters = MockRequesterRepository::new();
        requesters
            .expect_save_position()
            .times(1)
            .return_once(|id, _| Err(RequesterRepositoryError::not_found(id.to_string())));
        let service = make_service(MockProviderRepository::new(), requesters);

        let error = service
            .set_requester_location(SetRequesterLocationRequest {
                requester_id: RequesterId::random(),
                latitude: 1.0,
                longitude: 1.0,
            })
            .await
            .expect_err("requester missing");

        assert_eq!(error.code(), ErrorCode::RequesterNotFound);
    }

    #[tokio::test]
    async fn requester_without_a_saved_location_reads_as_none() {
        let mut requesters = MockRequesterRepository::new();
        requesters
            .expect_find_by_id()
            .times(1)
            .return_once(|id| Ok(Some(Requester::new(*id, "Grace"))));
        let service = make_service(MockProviderRepository::new(), requesters);

        let location = service
            .requester_location(&RequesterId::random())
            .await
            .expect("lookup succeeds");

        assert!(location.is_none());
    }

    #[tokio::test]
    async fn provider_location_requires_an_address() {
        let service = make_service(MockProviderRepository::new(), MockRequesterRepository::new());

        let error = service
            .set_provider_location(SetProviderLocationRequest {
                provider_id: ProviderId::random(),
                latitude: 0.0,
                longitude: 0.0,
                address: "   ".to_owned(),
            })
            .await
            .expect_err("address required");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn provider_location_and_address_are_saved_together() {
        let provider_id = ProviderId::random();
        let mut providers = MockProviderRepository::new();
        providers
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(Provider::new(provider_id))));
        providers
            .expect_save_details()
            .withf(|provider| {
                provider.address == "1 High Street"
                    && provider.location.map(|point| point.coordinates()) == Some([0.5, 51.0])
            })
            .times(1)
            .return_once(|_| Ok(()));
        let service = make_service(providers, MockRequesterRepository::new());

        let updated = service
            .set_provider_location(SetProviderLocationRequest {
                provider_id,
                latitude: 51.0,
                longitude: 0.5,
                address: " 1 High Street ".to_owned(),
            })
            .await
            .expect("location saved");

        assert_eq!(updated.address, "1 High Street");
        assert_eq!(updated.location.coordinates(), [0.5, 51.0]);
    }
}
