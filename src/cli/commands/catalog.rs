//! Catalog command handler

use super::{check, Service};
use crate::args::CatalogSubcommand;

/// Dispatch catalog subcommands
pub fn run(subcommand: CatalogSubcommand, service: &Service) {
    let catalog = check(service.catalog());

    match subcommand {
        CatalogSubcommand::List => print!("{catalog}"),
        CatalogSubcommand::Show { code } => {
            let course = check(catalog.get_course(&code));
            println!("{} - {}", course.code, course.title);
            println!("  Credits:  {}", course.credits);
            println!("  Offered:  year {} {}", course.year_tier, course.semester);

            let prereqs = check(catalog.prerequisites_of(&code));
            if prereqs.is_empty() {
                println!("  Requires: none");
            } else {
                let codes: Vec<&str> = prereqs.iter().map(|c| c.code.as_str()).collect();
                println!("  Requires: {}", codes.join(", "));
            }

            let unlocks: Vec<&str> = catalog
                .dependents_of(&code)
                .iter()
                .map(|c| c.code.as_str())
                .collect();
            if !unlocks.is_empty() {
                println!("  Unlocks:  {}", unlocks.join(", "));
            }
        }
        CatalogSubcommand::Check => {
            println!("✓ Catalog is valid ({} courses)", catalog.len());
            if let Some(cyclic) = catalog.cyclic_courses() {
                println!(
                    "⚠ Prerequisite cycle involving: {} (these courses can never be assigned)",
                    cyclic.join(", ")
                );
            }
        }
    }
}
