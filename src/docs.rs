// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Floor ---
        handlers::floor::list_floors,
        handlers::floor::list_halls,
        handlers::floor::list_free_tables,
        handlers::floor::create_hall,
        handlers::floor::update_hall,
        handlers::floor::delete_hall,
        handlers::floor::create_table,
        handlers::floor::update_table,
        handlers::floor::delete_table,

        // --- Tables ---
        handlers::tables::update_status,
        handlers::tables::schedule_reservation,
        handlers::tables::cancel_reservation,
        handlers::tables::get_open_order,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::update_order,
        handlers::orders::settle_order,
        handlers::orders::transfer_order,

        // --- Menu ---
        handlers::menu::get_menu,

        // --- Settings ---
        handlers::settings::get_status_colors,
        handlers::settings::update_status_color,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,

        // --- Reports ---
        handlers::reports::sales_report,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::PublicUser,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Floor ---
            models::floor::TableStatus,
            models::floor::Floor,
            models::floor::Hall,
            models::floor::DiningTable,
            models::floor::HallWithTables,
            models::floor::FreeTable,
            models::floor::CreateHallRequest,
            models::floor::UpdateHallRequest,
            models::floor::CreateTableRequest,
            models::floor::UpdateTableRequest,
            models::floor::UpdateTableStatusRequest,
            models::floor::ScheduleReservationRequest,

            // --- Orders ---
            models::order::FactorStatus,
            models::order::Factor,
            models::order::OrderItem,
            models::order::OpenOrder,
            models::order::OpenOrderResponse,
            models::order::OrderLineInput,
            models::order::CreateOrderRequest,
            models::order::UpdateOrderRequest,
            models::order::SettleOrderRequest,
            models::order::TransferOrderRequest,
            models::order::OrderCreated,
            models::order::OrderUpdated,

            // --- Menu ---
            models::menu::MenuCategory,
            models::menu::MenuItem,
            models::menu::MenuData,

            // --- Settings ---
            models::settings::StatusColor,
            models::settings::StatusColorEntry,
            models::settings::StatusColorMap,
            models::settings::UpdateStatusColorRequest,

            // --- Users ---
            models::auth::CreateUserRequest,
            models::auth::UpdateUserRequest,

            // --- Reports ---
            models::report::SalesPeriod,
            models::report::SalesTotal,
            models::report::SalesReport,
        )
    ),
    tags(
        (name = "Auth", description = "Login da equipe"),
        (name = "Floor", description = "Andares, salões e mesas"),
        (name = "Tables", description = "Status das mesas e reservas"),
        (name = "Orders", description = "Pedidos: criação, edição, fechamento e transferência"),
        (name = "Menu", description = "Cardápio"),
        (name = "Settings", description = "Cores dos status de mesa"),
        (name = "Users", description = "Cadastro da equipe"),
        (name = "Reports", description = "Relatório de vendas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
