use actix_web::web;

pub mod backend_health;
pub mod matches;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Match routes (require authentication; role checks happen per operation)
    cfg.service(
        web::scope("/matches")
            .wrap(AuthMiddleware)
            .service(matches::list_matches)
            .service(matches::create_match)
            .service(matches::get_match)
            .service(matches::set_lineup)
            .service(matches::start_match)
            .service(matches::end_match)
            .service(matches::record_halftime)
            .service(matches::record_goal)
            .service(matches::undo_last_goal)
            .service(matches::record_card)
            .service(matches::record_incident)
            .service(matches::record_substitution)
            .service(matches::substitution_candidates)
            .service(matches::set_minute)
            .service(matches::increment_minute)
            .service(matches::decrement_minute)
            .service(matches::match_summary)
    );
    // Roster routes (require authentication)
    cfg.service(
        web::scope("/players")
            .wrap(AuthMiddleware)
            .service(matches::get_roster)
            .service(matches::upsert_player)
    );
}
