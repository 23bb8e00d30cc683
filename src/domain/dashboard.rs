use std::collections::BTreeMap;

use super::entities::{Package, PackageStatus};
use super::i18n::MessageKey;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_packages: usize,
    pub by_status: BTreeMap<PackageStatus, usize>,
    /// Kilograms still held in a warehouse (received or consolidated).
    pub in_stock_weight: f64,
}

impl DashboardSummary {
    pub fn count(&self, status: PackageStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Counts every status, including the ones with no packages.
pub fn status_breakdown(packages: &[Package]) -> BTreeMap<PackageStatus, usize> {
    let mut counts: BTreeMap<PackageStatus, usize> =
        PackageStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for package in packages {
        *counts.entry(package.status).or_default() += 1;
    }
    counts
}

pub fn in_stock_weight(packages: &[Package]) -> f64 {
    packages
        .iter()
        .filter(|package| package.status.is_in_stock())
        .map(|package| package.weight)
        .filter(|weight| weight.is_finite() && *weight > 0.0)
        .sum()
}

pub fn summarize(packages: &[Package]) -> DashboardSummary {
    DashboardSummary {
        total_packages: packages.len(),
        by_status: status_breakdown(packages),
        in_stock_weight: in_stock_weight(packages),
    }
}

pub fn status_label_key(status: PackageStatus) -> MessageKey {
    match status {
        PackageStatus::Pending => MessageKey::DashStatusPending,
        PackageStatus::Received => MessageKey::DashStatusStock,
        PackageStatus::Consolidated => MessageKey::DashStatusConsolidated,
        PackageStatus::Shipped => MessageKey::DashStatusShipped,
        PackageStatus::Delivered => MessageKey::DashStatusDelivered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(id: &str, weight: f64, status: PackageStatus) -> Package {
        Package {
            id: id.to_string(),
            tracking_number: format!("RB-{id}"),
            origin: "FR".to_string(),
            weight,
            status,
            description: "Item".to_string(),
            date_received: None,
        }
    }

    #[test]
    fn counts_each_status_and_stock_weight() {
        let packages = vec![
            package("1", 1.5, PackageStatus::Received),
            package("2", 2.0, PackageStatus::Received),
            package("3", 4.0, PackageStatus::Shipped),
            package("4", 0.5, PackageStatus::Consolidated),
        ];
        let summary = summarize(&packages);
        assert_eq!(summary.total_packages, 4);
        assert_eq!(summary.count(PackageStatus::Received), 2);
        assert_eq!(summary.count(PackageStatus::Shipped), 1);
        assert_eq!(summary.count(PackageStatus::Pending), 0);
        assert_eq!(summary.by_status.len(), PackageStatus::ALL.len());
        assert_eq!(summary.in_stock_weight, 4.0);
    }

    #[test]
    fn empty_dashboard() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_packages, 0);
        assert_eq!(summary.in_stock_weight, 0.0);
        assert!(summary.by_status.values().all(|count| *count == 0));
    }
}
