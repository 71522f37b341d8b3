use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
}

/// Claim as returned by every claim endpoint. `amount` is an exact decimal string.
#[derive(ToSchema)]
pub struct ClaimDoc {
    pub claim_id: String,
    pub user_id: String,
    #[schema(example = "100.5")]
    pub amount: String,
    pub description: Option<String>,
    #[schema(example = "PENDING")]
    pub status: String,
    #[schema(example = "2025-03-04T05:06:07.000042Z")]
    pub created_at: String,
}

/// `amount` accepts a JSON number or a decimal string; must be >= 0.
#[derive(ToSchema)]
pub struct CreateClaimDoc {
    pub user_id: String,
    #[schema(example = "100.50")]
    pub amount: String,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct StatusPatchDoc {
    #[schema(example = "approved")]
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::claims::create,
        crate::routes::claims::list,
        crate::routes::claims::get,
        crate::routes::claims::update_status,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            ClaimDoc,
            CreateClaimDoc,
            StatusPatchDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "claims")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_claim_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/health".to_string()));
        assert!(paths.contains(&"/claims".to_string()));
        assert!(paths.contains(&"/claims/{claim_id}".to_string()));
    }
}
