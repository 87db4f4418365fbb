use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(utoipa::ToSchema)]
pub struct NewServiceProviderDoc {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub appliance_types: Vec<String>,
}

#[derive(utoipa::ToSchema)]
pub struct ServiceProviderUpdateDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub appliance_types: Option<Vec<String>>,
}

#[derive(utoipa::ToSchema)]
pub struct NewApplianceDoc {
    pub name: String,
    pub r#type: String,
    pub room: String,
    pub floor: String,
    pub status: String,
}

#[derive(utoipa::ToSchema)]
pub struct ApplianceUpdateDoc {
    pub name: Option<String>,
    pub r#type: Option<String>,
    pub room: Option<String>,
    pub floor: Option<String>,
    pub status: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct NewIssueDoc {
    pub appliance_id: String,
    pub appliance_name: String,
    pub room: String,
    pub floor: String,
    pub description: String,
    pub status: Option<String>,
    pub priority: String,
    pub reported_by: String,
    pub service_provider: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct IssueUpdateDoc {
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub service_provider: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct NotifyResponseDoc {
    pub notified: bool,
    pub service_provider: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::providers::list,
        crate::routes::providers::create,
        crate::routes::providers::update,
        crate::routes::providers::delete,
        crate::routes::appliances::list,
        crate::routes::appliances::create,
        crate::routes::appliances::update,
        crate::routes::appliances::delete,
        crate::routes::issues::list,
        crate::routes::issues::create,
        crate::routes::issues::update,
        crate::routes::issues::delete,
        crate::routes::issues::notify,
    ),
    components(
        schemas(
            HealthResponse,
            NewServiceProviderDoc,
            ServiceProviderUpdateDoc,
            NewApplianceDoc,
            ApplianceUpdateDoc,
            NewIssueDoc,
            IssueUpdateDoc,
            NotifyResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "service-providers"),
        (name = "appliances"),
        (name = "issues")
    )
)]
pub struct ApiDoc;
