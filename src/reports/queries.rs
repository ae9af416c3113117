//! The SQL text of every report.
//!
//! These strings are the interface contract with the claims schema: table
//! and column names must match the database exactly, and the result
//! aliases (medication_type, total_cost, ...) are the contract with the
//! shaping stage. Money aggregates are cast to `double precision` so the
//! client decodes them as floats.

/// Total cost and prescription count split into brand vs generic.
///
/// Brand detection relies on the `||` marker the upstream product import
/// embeds in brand names; products without it are treated as generic.
pub const MEDICATION_TYPE_COSTS: &str = r#"
SELECT
    CASE
        WHEN prd.name LIKE '%||%' THEN 'Brand'
        ELSE 'Generic'
    END AS medication_type,
    SUM(p."cost")::double precision AS total_cost,
    COUNT(p.id) AS prescription_count
FROM
    public.prescription p
LEFT JOIN
    public.product prd ON p."productId" = prd.id
WHERE
    prd."type" = 'DRUG' AND prd.category = 'MEDICINE'
GROUP BY
    medication_type
ORDER BY
    total_cost DESC;
"#;

/// Average prescription cost per practitioner, practitioners with at
/// least 50 prescriptions.
pub const PRACTITIONER_PERFORMANCE: &str = r#"
SELECT
    pr.id AS practitioner_id,
    CONCAT(pr."firstName", ' ', pr."lastName") AS practitioner_name,
    pt.type AS practitioner_type,
    AVG(p."cost")::double precision AS average_prescription_cost,
    COUNT(p.id) AS prescription_count
FROM
    public.prescription p
LEFT JOIN
    public.patient_visit pv ON p."patientVisitId" = pv.id
LEFT JOIN
    public.practitioner pr ON pv."practitionerId" = pr.id
LEFT JOIN
    public.practitioner_type pt ON pr."practitionerTypeId" = pt.id
GROUP BY
    pr.id, practitioner_name, pt.type
HAVING
    COUNT(p.id) >= 50
ORDER BY
    average_prescription_cost DESC;
"#;

/// Prescription counts by practitioner type and medication.
pub const PRESCRIBING_BY_TYPE_AND_MEDICATION: &str = r#"
SELECT
    pt.type AS practitioner_type,
    prd.name AS medication_name,
    COUNT(p.id) AS prescription_count,
    SUM(p."cost")::double precision AS total_cost
FROM
    public.prescription p
LEFT JOIN
    public.patient_visit pv ON p."patientVisitId" = pv.id
LEFT JOIN
    public.practitioner pr ON pv."practitionerId" = pr.id
LEFT JOIN
    public.practitioner_type pt ON pr."practitionerTypeId" = pt.id
LEFT JOIN
    public.product prd ON p."productId" = prd.id
GROUP BY
    pt.type, prd.name
ORDER BY
    prescription_count DESC;
"#;

/// Tariff price vs claim amount for the ten costliest products.
pub const TARIFF_VS_CLAIM: &str = r#"
SELECT
    prd.name AS prescription_name,
    AVG(t.price)::double precision AS average_tariff_price,
    AVG(p."cost")::double precision AS average_claim_amount,
    AVG(p."cost" - t.price)::double precision AS average_difference
FROM
    public.prescription p
LEFT JOIN
    public.product prd ON p."productId" = prd.id
LEFT JOIN
    public.tariff t ON p."tariffId" = t.id
WHERE
    prd.name IN (
        SELECT
            prd.name
        FROM
            public.prescription p
        LEFT JOIN
            public.product prd ON p."productId" = prd.id
        GROUP BY
            prd.name
        ORDER BY
            SUM(p."cost") DESC
        LIMIT 10
    )
GROUP BY
    prd.name
ORDER BY
    average_difference DESC;
"#;

/// Total cost per province for the ten costliest products.
pub const PROVINCIAL_COSTS: &str = r#"
SELECT
    lp.name AS province_name,
    prd.name AS prescription_name,
    SUM(p."cost")::double precision AS total_cost
FROM
    public.prescription p
LEFT JOIN
    public.product prd ON p."productId" = prd.id
LEFT JOIN
    public.patient_visit pv ON p."patientVisitId" = pv.id
LEFT JOIN
    public.facility f ON pv."dispensingFacilityId" = f.id
LEFT JOIN
    public.location lp ON f."provinceId" = lp.id
WHERE
    UPPER(lp.type) = 'PROVINCE' AND
    prd.name IN (
        SELECT
            prd.name
        FROM
            public.prescription p
        LEFT JOIN
            public.product prd ON p."productId" = prd.id
        GROUP BY
            prd.name
        ORDER BY
            SUM(p."cost") DESC
        LIMIT 10
    )
GROUP BY
    lp.name, prd.name
ORDER BY
    total_cost DESC;
"#;

/// Monthly cost totals for the ten costliest products.
pub const MONTHLY_TRENDS: &str = r#"
SELECT
    prd.name AS prescription_name,
    DATE_TRUNC('month', p."prescribedAt") AS month,
    SUM(p."cost")::double precision AS monthly_total
FROM
    public.prescription p
LEFT JOIN
    public.product prd ON p."productId" = prd.id
WHERE
    prd.name IN (
        SELECT
            prd.name
        FROM
            public.prescription p
        LEFT JOIN
            public.product prd ON p."productId" = prd.id
        GROUP BY
            prd.name
        ORDER BY
            SUM(p."cost") DESC
        LIMIT 10
    )
GROUP BY
    prd.name, month
ORDER BY
    month, prescription_name;
"#;

/// The ten costliest products by total claim amount.
pub const TOP_PRESCRIPTIONS: &str = r#"
SELECT
    prd.name AS prescription_name,
    SUM(p."cost")::double precision AS total_claim_amount
FROM
    public.prescription p
LEFT JOIN
    public.product prd ON p."productId" = prd.id
GROUP BY
    prd.name
ORDER BY
    total_claim_amount DESC
LIMIT 10;
"#;

/// Distinct member counts per province.
pub const MEMBERSHIP_BY_PROVINCE: &str = r#"
SELECT
    lp.name AS province_name,
    COUNT(DISTINCT m.id) AS member_count
FROM
    public.member m
LEFT JOIN
    public.patient_visit pv ON m.id = pv."patientId"
LEFT JOIN
    public.facility f ON pv."dispensingFacilityId" = f.id
LEFT JOIN
    public.location lp ON f."provinceId" = lp.id
WHERE
    UPPER(lp.type) = 'PROVINCE'
GROUP BY
    lp.name
ORDER BY
    member_count DESC;
"#;

/// Distinct facility counts per province.
pub const FACILITIES_BY_PROVINCE: &str = r#"
SELECT
    lp.name AS province_name,
    COUNT(DISTINCT f.id) AS facility_count
FROM
    public.facility f
LEFT JOIN
    public.location lp ON f."provinceId" = lp.id
WHERE
    UPPER(lp.type) = 'PROVINCE'
GROUP BY
    lp.name
ORDER BY
    facility_count ASC;
"#;

/// Patient visit counts per province.
pub const VISITS_BY_PROVINCE: &str = r#"
SELECT
    lp.name AS province_name,
    COUNT(pv.id) AS patient_visit_count
FROM
    public.patient_visit pv
LEFT JOIN
    public.facility f ON pv."dispensingFacilityId" = f.id
LEFT JOIN
    public.location lp ON f."provinceId" = lp.id
WHERE
    lp.type = 'PROVINCE'
GROUP BY
    lp.name
ORDER BY
    patient_visit_count DESC;
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_are_stable() {
        // The shaping stage addresses result columns by these aliases.
        assert!(MEDICATION_TYPE_COSTS.contains("AS medication_type"));
        assert!(MEDICATION_TYPE_COSTS.contains("AS total_cost"));
        assert!(MEDICATION_TYPE_COSTS.contains("AS prescription_count"));
        assert!(PRACTITIONER_PERFORMANCE.contains("AS practitioner_type"));
        assert!(PROVINCIAL_COSTS.contains("AS province_name"));
        assert!(MONTHLY_TRENDS.contains("AS month"));
        assert!(TOP_PRESCRIPTIONS.contains("AS total_claim_amount"));
        assert!(VISITS_BY_PROVINCE.contains("AS patient_visit_count"));
    }

    #[test]
    fn test_money_aggregates_are_cast() {
        for sql in [
            MEDICATION_TYPE_COSTS,
            PRACTITIONER_PERFORMANCE,
            TARIFF_VS_CLAIM,
            PROVINCIAL_COSTS,
            MONTHLY_TRENDS,
            TOP_PRESCRIPTIONS,
        ] {
            assert!(sql.contains("::double precision"), "uncast aggregate in {}", sql);
        }
    }
}
