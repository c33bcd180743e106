//! Small in-memory rate tables shared by the calculator unit tests.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    BracketSchedule, FilingStatus, HousingRate, Rank, RateTables, StateTaxMethod, TaxBracket,
};

pub(crate) fn rank(s: &str) -> Rank {
    Rank::parse(s).unwrap()
}

pub(crate) fn schedule(bands: &[(Decimal, Option<Decimal>, Decimal)]) -> BracketSchedule {
    BracketSchedule::new(
        bands
            .iter()
            .map(|&(min_income, max_income, rate)| TaxBracket {
                min_income,
                max_income,
                rate,
            })
            .collect(),
    )
    .unwrap()
}

pub(crate) fn federal_single() -> BracketSchedule {
    schedule(&[
        (dec!(0), Some(dec!(11925)), dec!(0.10)),
        (dec!(11925), Some(dec!(48475)), dec!(0.12)),
        (dec!(48475), Some(dec!(103350)), dec!(0.22)),
        (dec!(103350), Some(dec!(197300)), dec!(0.24)),
        (dec!(197300), Some(dec!(250525)), dec!(0.32)),
        (dec!(250525), Some(dec!(626350)), dec!(0.35)),
        (dec!(626350), None, dec!(0.37)),
    ])
}

pub(crate) fn federal_married() -> BracketSchedule {
    schedule(&[
        (dec!(0), Some(dec!(23850)), dec!(0.10)),
        (dec!(23850), Some(dec!(96950)), dec!(0.12)),
        (dec!(96950), Some(dec!(206700)), dec!(0.22)),
        (dec!(206700), Some(dec!(394600)), dec!(0.24)),
        (dec!(394600), Some(dec!(501050)), dec!(0.32)),
        (dec!(501050), Some(dec!(751600)), dec!(0.35)),
        (dec!(751600), None, dec!(0.37)),
    ])
}

pub(crate) fn virginia() -> BracketSchedule {
    schedule(&[
        (dec!(0), Some(dec!(3000)), dec!(0.02)),
        (dec!(3000), Some(dec!(5000)), dec!(0.03)),
        (dec!(5000), Some(dec!(17000)), dec!(0.05)),
        (dec!(17000), None, dec!(0.0575)),
    ])
}

/// 2025 federal and FICA figures, three states, two ranks, two duty stations.
pub(crate) fn tables() -> RateTables {
    let mut tables = RateTables::default();

    tables.federal.set_schedule(FilingStatus::Single, federal_single());
    tables.federal.set_schedule(FilingStatus::Married, federal_married());

    tables.states.insert(
        "VA",
        StateTaxMethod::Progressive {
            single: virginia(),
            married: Some(virginia()),
        },
    );
    tables.states.insert("IL", StateTaxMethod::Flat(dec!(0.0495)));
    tables.states.insert("TX", StateTaxMethod::NoIncomeTax);

    for (years, pay) in [
        (0, dec!(2964.00)),
        (2, dec!(3262.80)),
        (3, dec!(3394.20)),
        (4, dec!(3406.80)),
        (6, dec!(3682.80)),
        (8, dec!(3758.70)),
    ] {
        tables.base_pay.insert(rank("E-6"), years, pay);
    }
    for (years, pay) in [
        (0, dec!(4150.20)),
        (2, dec!(4698.00)),
        (3, dec!(5070.30)),
        (4, dec!(5384.40)),
    ] {
        tables.base_pay.insert(rank("O-3"), years, pay);
    }

    tables.housing.insert(
        "NORFOLK/PORTSMOUTH, VA",
        rank("E-6"),
        HousingRate {
            without_dependents: dec!(2013.00),
            with_dependents: dec!(2373.00),
        },
    );
    tables.housing.insert(
        "NORFOLK/PORTSMOUTH, VA",
        rank("O-3"),
        HousingRate {
            without_dependents: dec!(2226.00),
            with_dependents: dec!(2532.00),
        },
    );
    tables.housing.insert(
        "SAN DIEGO, CA",
        rank("E-6"),
        HousingRate {
            without_dependents: dec!(3402.00),
            with_dependents: dec!(3972.00),
        },
    );

    tables
}
