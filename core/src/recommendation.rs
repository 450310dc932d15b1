//! Recommendation synthesis: one human-readable line per populated
//! anomaly group, in a fixed order (duplicates, seasonal, fraud, then
//! the remaining types).

use crate::anomaly::{Anomaly, AnomalyType};

pub fn synthesize(ranked: &[Anomaly]) -> Vec<String> {
    let count = |ty: AnomalyType| ranked.iter().filter(|a| a.anomaly_type == ty).count();

    let mut recommendations = Vec::new();

    let duplicates = count(AnomalyType::DuplicateCharge);
    if duplicates > 0 {
        recommendations.push(format!(
            "Found {} potential duplicate transaction group{}; review and remove duplicates to avoid double charges",
            duplicates,
            plural(duplicates)
        ));
    }

    let seasonal = count(AnomalyType::SeasonalSpike);
    if seasonal > 0 {
        let mut categories: Vec<&str> = Vec::new();
        for anomaly in ranked {
            if anomaly.anomaly_type != AnomalyType::SeasonalSpike {
                continue;
            }
            if let Some(cat) = anomaly.category.as_deref() {
                if !categories.contains(&cat) {
                    categories.push(cat);
                }
            }
        }
        recommendations.push(format!(
            "Unusual spending detected in: {}; consider setting budget alerts for these categories",
            categories.join(", ")
        ));
    }

    if count(AnomalyType::FraudRisk) > 0 {
        recommendations.push(
            "⚠️ Potential fraud indicators detected; review recent transactions immediately"
                .to_string(),
        );
    }

    let velocity = count(AnomalyType::VelocitySpike);
    if velocity > 0 {
        recommendations.push(format!(
            "Spending spiked on {} day{}; check those days for unauthorized activity",
            velocity,
            plural(velocity)
        ));
    }

    let outliers = count(AnomalyType::StatisticalOutlier);
    if outliers > 0 {
        recommendations.push(format!(
            "{} transaction{} had unusually large amounts; verify these charges",
            outliers,
            plural(outliers)
        ));
    }

    let new_vendors = count(AnomalyType::NewVendorRisk);
    if new_vendors > 0 {
        recommendations.push(format!(
            "{} new payee{} matched high-risk keywords; confirm you recognize these merchants",
            new_vendors,
            plural(new_vendors)
        ));
    }

    let rare = count(AnomalyType::RareAmountCluster);
    if rare > 0 {
        recommendations.push(format!(
            "{} transaction{} fell outside your usual amount ranges; confirm they are expected",
            rare,
            plural(rare)
        ));
    }

    recommendations
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
