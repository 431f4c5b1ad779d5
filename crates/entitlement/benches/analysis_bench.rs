//! Benchmarks for the analysis pipeline.
//!
//! Run with: cargo bench -p entitlement

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use entitlement::parcel::{
    CorridorTier, FireHazardClass, IncomeLevel, ParcelAttributes, ProposedProjectOptions,
    RentControlStatus,
};
use entitlement::{analyze_parcel, encode_report, AnalysisRequest, EngineParams, StandardsTables};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn request(zone: &str, lot_area_sqft: f64, overlays: &[&str]) -> AnalysisRequest {
    let mut parcel = ParcelAttributes {
        parcel_id: format!("bench-{zone}"),
        zone_code: zone.to_string(),
        lot_area_sqft,
        overlay_codes: overlays.iter().map(|s| s.to_string()).collect(),
        development_tier: Some(2),
        corridor_tier: Some(CorridorTier::Tier3),
        ..Default::default()
    };
    parcel.constraints.rent_control = RentControlStatus::NotControlled;
    parcel.constraints.fire_hazard = FireHazardClass::NotInZone;
    parcel.context.transit_distance_miles = Some(0.4);
    parcel.context.qualifying_transit_stop = true;
    parcel.context.street_row_width_ft = Some(100.0);
    AnalysisRequest {
        request_id: "bench".to_string(),
        parcel,
        proposed: Some(ProposedProjectOptions {
            target_affordable_pct: Some(15.0),
            income_level: Some(IncomeLevel::VeryLow),
            ..Default::default()
        }),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_analyze_parcel(c: &mut Criterion) {
    let tables = StandardsTables::default();
    let params = EngineParams::default();
    let cases = [
        ("R1", request("R1", 7_000.0, &[])),
        ("R3", request("R3", 12_446.0, &["AHO"])),
        ("GC", request("GC", 21_780.0, &["DCP", "BAP"])),
    ];

    let mut group = c.benchmark_group("analyze_parcel");
    for (name, req) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), req, |b, req| {
            b.iter(|| analyze_parcel(black_box(&tables), black_box(&params), black_box(req)))
        });
    }
    group.finish();
}

fn bench_encode_report(c: &mut Criterion) {
    let tables = StandardsTables::default();
    let params = EngineParams::default();
    let report = match analyze_parcel(&tables, &params, &request("GC", 21_780.0, &["DCP"])) {
        Ok(report) => report,
        Err(e) => panic!("bench fixture rejected: {e}"),
    };
    c.bench_function("encode_report", |b| b.iter(|| encode_report(black_box(&report))));
}

criterion_group!(benches, bench_analyze_parcel, bench_encode_report);
criterion_main!(benches);
