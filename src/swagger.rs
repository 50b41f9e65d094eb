use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::giveaway::create_giveaway,
        handlers::giveaway::get_giveaway,
        handlers::giveaway::get_participants_count,
        handlers::giveaway::participate,
        handlers::giveaway::get_leaderboard,
        handlers::giveaway::check_requirements,
        handlers::participant::get_participant,
        handlers::participant::vote,
        handlers::participant::get_rank,
        handlers::participant::get_voters,
        handlers::voter::invalidate_vote,
        handlers::client_log::log_error,
    ),
    components(
        schemas(
            TelegramUser,
            ChatRef,
            RequirementSet,
            GiveawayStatus,
            CreateGiveawayRequest,
            GiveawayResponse,
            CreateGiveawayResponse,
            ParticipateRequest,
            ParticipantResponse,
            ParticipantsCountResponse,
            VoteRequest,
            VoteOutcome,
            VoterResponse,
            VoteResponse,
            VoterListItem,
            ParticipantRank,
            LeaderboardResponse,
            RankResponse,
            RequirementKind,
            RequirementScope,
            CheckStatus,
            ChatCheck,
            RequirementReport,
            RequirementCheckRequest,
            RequirementCheckResponse,
            ApiError,
        )
    ),
    tags(
        (name = "giveaway", description = "Giveaway API"),
        (name = "participant", description = "Participant and voting API"),
        (name = "voter", description = "Vote moderation API"),
        (name = "client", description = "Mini App client API"),
    ),
    info(
        title = "Vote Giveaway Backend API",
        version = "1.0.0",
        description = "Telegram voting giveaway REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
