//! Deployed default rule set: zones, the metro rate table, corridor rules
//! and the standard surcharges. Installed only into an empty store so
//! operator edits survive restarts.

use sqlx::{types::Json, Executor, Pool, Postgres, Row};

use crate::entities::{
    AmountType, Classification, DistanceRange, EquipmentType, OriginType, PricingMode, Rate,
    RateBracket, RouteRule, RouteType, SurchargeCondition, SurchargeKind, SurchargeRule,
    TariffRule, TimeRange, TripType, Zone, CODE_EXTRA_FLOORS, CODE_ROBOTIC_CHAIR,
    CODE_WAITING_HOUR,
};
use crate::error::Error;

pub(super) async fn install(pool: &Pool<Postgres>) -> Result<(), Error> {
    let mut conn = pool.acquire().await?;

    let row = conn
        .fetch_one(sqlx::query("SELECT COUNT(*) AS n FROM zones"))
        .await?;
    let existing: i64 = row.try_get("n")?;
    if existing > 0 {
        return Ok(());
    }

    for zone in default_zones() {
        conn.execute(
            sqlx::query("INSERT INTO zones (slug, data) VALUES ($1, $2)")
                .bind(&zone.slug)
                .bind(Json(&zone)),
        )
        .await?;
    }

    for rate in default_rates() {
        conn.execute(sqlx::query("INSERT INTO rates (data) VALUES ($1)").bind(Json(&rate)))
            .await?;
    }

    for rule in default_route_rules() {
        conn.execute(
            sqlx::query("INSERT INTO route_rules (id, data) VALUES ($1, $2)")
                .bind(&rule.id)
                .bind(Json(&rule)),
        )
        .await?;
    }

    for tariff in default_tariff_rules() {
        conn.execute(
            sqlx::query("INSERT INTO tariff_rules (id, data) VALUES ($1, $2)")
                .bind(&tariff.id)
                .bind(Json(&tariff)),
        )
        .await?;
    }

    for rule in default_surcharge_rules() {
        conn.execute(
            sqlx::query("INSERT INTO surcharge_rules (id, data) VALUES ($1, $2)")
                .bind(&rule.id)
                .bind(Json(&rule)),
        )
        .await?;
    }

    for (day, name) in default_holidays() {
        conn.execute(
            sqlx::query("INSERT INTO holidays (day, name) VALUES ($1::date, $2)")
                .bind(day)
                .bind(name),
        )
        .await?;
    }

    tracing::info!("installed default rule set");

    Ok(())
}

fn default_zones() -> Vec<Zone> {
    vec![
        Zone {
            slug: "medellin".into(),
            name: "Medellín".into(),
            classification: Classification::Metropolitan,
            base_fare: None,
            price_per_km: None,
            keywords: [
                "el poblado",
                "laureles",
                "belén",
                "robledo",
                "centro",
                "envigado",
                "itagüí",
                "sabaneta",
                "bello",
            ]
            .map(String::from)
            .to_vec(),
        },
        Zone {
            slug: "copacabana".into(),
            name: "Copacabana".into(),
            classification: Classification::Metropolitan,
            base_fare: None,
            price_per_km: None,
            keywords: vec!["copacabana".into(), "girardota".into(), "barbosa".into()],
        },
        Zone {
            slug: "oriente".into(),
            name: "Oriente antioqueño".into(),
            classification: Classification::OutsideCity,
            base_fare: Some(100000.0),
            price_per_km: Some(3500.0),
            keywords: [
                "rionegro",
                "la ceja",
                "aeropuerto",
                "llanogrande",
                "guarne",
                "marinilla",
                "el retiro",
            ]
            .map(String::from)
            .to_vec(),
        },
    ]
}

fn default_rates() -> Vec<Rate> {
    let mut rates = Vec::new();

    // metro table: (trip, equipment) x distance bucket
    let metro: [(TripType, EquipmentType, [f64; 3]); 4] = [
        (TripType::Sencillo, EquipmentType::Rampa, [70000.0, 75000.0, 85000.0]),
        (TripType::Doble, EquipmentType::Rampa, [120000.0, 130000.0, 150000.0]),
        (
            TripType::Sencillo,
            EquipmentType::RoboticaPlegable,
            [90000.0, 95000.0, 110000.0],
        ),
        (
            TripType::Doble,
            EquipmentType::RoboticaPlegable,
            [160000.0, 170000.0, 190000.0],
        ),
    ];
    for (trip_type, equipment, prices) in metro {
        let buckets = [
            DistanceRange::Hasta3Km,
            DistanceRange::De3A10Km,
            DistanceRange::Mas10Km,
        ];
        for (range, price) in buckets.into_iter().zip(prices) {
            rates.push(Rate {
                zone_slug: "medellin".into(),
                trip_type,
                equipment,
                bracket: RateBracket::Distance(range),
                price,
            });
        }
    }

    // northern municipalities, keyed by trip direction
    let municipality: [(TripType, EquipmentType, f64, f64); 4] = [
        (TripType::Sencillo, EquipmentType::Rampa, 95000.0, 100000.0),
        (TripType::Doble, EquipmentType::Rampa, 170000.0, 180000.0),
        (TripType::Sencillo, EquipmentType::RoboticaPlegable, 130000.0, 140000.0),
        (TripType::Doble, EquipmentType::RoboticaPlegable, 240000.0, 250000.0),
    ];
    for (trip_type, equipment, from_medellin, from_municipio) in municipality {
        rates.push(Rate {
            zone_slug: "copacabana".into(),
            trip_type,
            equipment,
            bracket: RateBracket::Origin(OriginType::DesdeMedellin),
            price: from_medellin,
        });
        rates.push(Rate {
            zone_slug: "copacabana".into(),
            trip_type,
            equipment,
            bracket: RateBracket::Origin(OriginType::DesdeMunicipio),
            price: from_municipio,
        });
    }

    // flat prices for destinations beyond the metro perimeter
    let out_of_city: [(TripType, EquipmentType, f64); 4] = [
        (TripType::Sencillo, EquipmentType::Rampa, 150000.0),
        (TripType::Doble, EquipmentType::Rampa, 260000.0),
        (TripType::Sencillo, EquipmentType::RoboticaPlegable, 190000.0),
        (TripType::Doble, EquipmentType::RoboticaPlegable, 330000.0),
    ];
    for (trip_type, equipment, price) in out_of_city {
        rates.push(Rate {
            zone_slug: "medellin".into(),
            trip_type,
            equipment,
            bracket: RateBracket::OutOfCity,
            price,
        });
    }

    rates
}

fn default_route_rules() -> Vec<RouteRule> {
    vec![RouteRule {
        id: "rr-oriente".into(),
        origin_zone: Some("oriente".into()),
        destination_zone: None,
        route_type: RouteType::GenericOutside,
        priority: 1,
        active: true,
    }]
}

fn default_tariff_rules() -> Vec<TariffRule> {
    let floors: [(TripType, EquipmentType, f64); 4] = [
        (TripType::Sencillo, EquipmentType::Rampa, 100000.0),
        (TripType::Doble, EquipmentType::Rampa, 180000.0),
        (TripType::Sencillo, EquipmentType::RoboticaPlegable, 130000.0),
        (TripType::Doble, EquipmentType::RoboticaPlegable, 240000.0),
    ];

    floors
        .into_iter()
        .enumerate()
        .map(|(i, (trip_type, equipment, min_price))| TariffRule {
            id: format!("tf-oriente-{}", i + 1),
            route_rule_id: "rr-oriente".into(),
            equipment,
            trip_type,
            mode: PricingMode::PerKm {
                price_per_km: 3500.0,
                min_price: Some(min_price),
            },
            active: true,
        })
        .collect()
}

fn default_surcharge_rules() -> Vec<SurchargeRule> {
    vec![
        SurchargeRule {
            id: "sur-001".into(),
            name: "Recargo nocturno".into(),
            kind: SurchargeKind::TimeWindow,
            amount_type: AmountType::Fixed,
            amount: 35000.0,
            unit: None,
            condition: SurchargeCondition {
                time_ranges: vec![TimeRange {
                    start: "18:00".into(),
                    end: "06:00".into(),
                }],
                ..Default::default()
            },
            active: true,
        },
        SurchargeRule {
            id: "sur-002".into(),
            name: "Recargo dominical y festivo".into(),
            kind: SurchargeKind::DayOrHoliday,
            amount_type: AmountType::Fixed,
            amount: 35000.0,
            unit: None,
            condition: SurchargeCondition {
                days_of_week: vec![0],
                include_holidays: true,
                ..Default::default()
            },
            active: true,
        },
        SurchargeRule {
            id: "sur-003".into(),
            name: "Silla robótica".into(),
            kind: SurchargeKind::ExtraService,
            amount_type: AmountType::Fixed,
            amount: 40000.0,
            unit: None,
            condition: SurchargeCondition {
                service_code: Some(CODE_ROBOTIC_CHAIR.into()),
                ..Default::default()
            },
            active: true,
        },
        SurchargeRule {
            id: "sur-004".into(),
            name: "Pisos adicionales".into(),
            kind: SurchargeKind::ExtraService,
            amount_type: AmountType::PerUnit,
            amount: 15000.0,
            unit: Some("piso".into()),
            condition: SurchargeCondition {
                service_code: Some(CODE_EXTRA_FLOORS.into()),
                floor_threshold: Some(3),
                ..Default::default()
            },
            active: true,
        },
        SurchargeRule {
            id: "sur-005".into(),
            name: "Hora de espera".into(),
            kind: SurchargeKind::ExtraService,
            amount_type: AmountType::PerUnit,
            amount: 30000.0,
            unit: Some("hora".into()),
            condition: SurchargeCondition {
                service_code: Some(CODE_WAITING_HOUR.into()),
                ..Default::default()
            },
            active: true,
        },
    ]
}

fn default_holidays() -> Vec<(&'static str, &'static str)> {
    vec![
        ("2026-01-01", "Año Nuevo"),
        ("2026-01-12", "Día de los Reyes Magos"),
        ("2026-03-23", "Día de San José"),
        ("2026-04-02", "Jueves Santo"),
        ("2026-04-03", "Viernes Santo"),
        ("2026-05-01", "Día del Trabajo"),
        ("2026-07-20", "Día de la Independencia"),
        ("2026-08-07", "Batalla de Boyacá"),
        ("2026-12-08", "Inmaculada Concepción"),
        ("2026-12-25", "Navidad"),
    ]
}
