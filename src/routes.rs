use crate::{
    api::{attendance, bonus, employee, office, review, salary},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let check_limiter = Arc::new(build_limiter(config.rate_check_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::my_attendance)),
                    )
                    // check-in/check-out carry their own tighter limiter
                    .service(
                        web::resource("/check-in")
                            .wrap(check_limiter.clone())
                            .route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out")
                            .wrap(check_limiter.clone())
                            .route(web::put().to(attendance::check_out)),
                    ),
            )
            .service(
                web::scope("/reviews")
                    .wrap(admin_limiter.clone())
                    // /reviews
                    .service(web::resource("").route(web::get().to(review::review_list)))
                    // /reviews/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(review::approve_review)),
                    )
                    // /reviews/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(review::reject_review)),
                    ),
            )
            .service(
                web::scope("/offices")
                    .wrap(admin_limiter.clone())
                    // /offices
                    .service(
                        web::resource("")
                            .route(web::post().to(office::create_office))
                            .route(web::get().to(office::list_offices)),
                    )
                    // /offices/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(office::update_office))
                            .route(web::get().to(office::get_office)),
                    )
                    // /offices/{id}/wifi
                    .service(
                        web::resource("/{id}/wifi")
                            .route(web::post().to(office::add_wifi))
                            .route(web::get().to(office::list_wifi)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .wrap(admin_limiter.clone())
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(employee::get_employee)),
                    )
                    // /employees/{id}/devices
                    .service(
                        web::resource("/{id}/devices")
                            .route(web::post().to(employee::register_device))
                            .route(web::get().to(employee::list_devices)),
                    )
                    // /employees/{id}/devices/{device_id}
                    .service(
                        web::resource("/{id}/devices/{device_id}")
                            .route(web::delete().to(employee::revoke_device)),
                    ),
            )
            .service(
                web::scope("/bonus")
                    // /bonus
                    .service(
                        web::resource("")
                            .route(web::post().to(bonus::create_bonus))
                            .route(web::get().to(bonus::bonus_list)),
                    )
                    // /bonus/{id}/approve
                    .service(
                        web::resource("/{id}/approve").route(web::put().to(bonus::approve_bonus)),
                    )
                    // /bonus/{id}/reject
                    .service(
                        web::resource("/{id}/reject").route(web::put().to(bonus::reject_bonus)),
                    ),
            )
            .service(
                web::scope("/salary")
                    .wrap(admin_limiter.clone())
                    // /salary
                    .service(
                        web::resource("")
                            .route(web::post().to(salary::create_salary_slip))
                            .route(web::get().to(salary::list_salary_slips)),
                    )
                    // /salary/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(salary::get_salary_slip)),
                    ),
            ),
    );
}

// CHECK-IN
//  ├─ geofence + wifi + device + work-hours rules
//  ├─ weighted score (0..100)
//  └─ >= threshold: auto-approved, else review queue

// CHECK-OUT
//  └─ total_minutes = check_out - check_in (floored at 0)
