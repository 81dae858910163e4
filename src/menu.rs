use std::io::{self, BufRead, Write};

use sqlx::PgPool;

use crate::models::employer::Employer;
use crate::models::vacancy::{Vacancy, VacancyListing};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Choice {
    Companies,
    AllVacancies,
    AverageSalary,
    AboveAverage,
    KeywordSearch,
    Exit,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim() {
        "1" => Some(Choice::Companies),
        "2" => Some(Choice::AllVacancies),
        "3" => Some(Choice::AverageSalary),
        "4" => Some(Choice::AboveAverage),
        "5" => Some(Choice::KeywordSearch),
        "6" => Some(Choice::Exit),
        _ => None,
    }
}

/// Interactive query loop over the stored data. Returns on the exit
/// choice or on end of input.
pub async fn run(pool: &PgPool) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("=== Vacancy database ===");
        println!("1. Companies and their vacancy counts");
        println!("2. All vacancies");
        println!("3. Average salary");
        println!("4. Vacancies with above-average salary");
        println!("5. Search vacancies by keyword");
        println!("6. Exit");
        print!("\nChoose an action (1-6): ");
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };

        match parse_choice(&line) {
            Some(Choice::Companies) => {
                println!("\nCompanies and vacancy counts:");
                for row in Employer::list_with_vacancy_counts(pool).await? {
                    println!("- {}: {} vacancies", row.name, row.vacancy_count);
                }
            }
            Some(Choice::AllVacancies) => {
                println!("\nAll vacancies:");
                for listing in Vacancy::list_all(pool).await? {
                    println!("{}", format_vacancy_line(&listing));
                }
            }
            Some(Choice::AverageSalary) => {
                let average = Vacancy::average_salary(pool).await?;
                println!("\nAverage salary across stored vacancies: {average:.0}");
            }
            Some(Choice::AboveAverage) => {
                println!("\nVacancies with above-average salary:");
                for listing in Vacancy::list_above_average_salary(pool).await? {
                    println!("{}", format_vacancy_line(&listing));
                }
            }
            Some(Choice::KeywordSearch) => {
                print!("Enter a keyword: ");
                io::stdout().flush()?;
                let Some(keyword) = lines.next().transpose()? else {
                    break;
                };
                let keyword = keyword.trim().to_string();
                if keyword.is_empty() {
                    println!("No keyword entered.");
                    continue;
                }

                let listings = Vacancy::search_by_title(pool, &keyword).await?;
                println!("\nVacancies matching '{keyword}':");
                if listings.is_empty() {
                    println!("No vacancies found.");
                }
                for listing in &listings {
                    println!("{}", format_vacancy_line(listing));
                }
            }
            Some(Choice::Exit) => break,
            None => println!("Invalid choice. Please enter a number from 1 to 6."),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn format_vacancy_line(listing: &VacancyListing) -> String {
    format!(
        "- {} | {} | Salary: {} | {}",
        listing.company_name,
        listing.title,
        format_salary(
            listing.salary_from,
            listing.salary_to,
            listing.currency.as_deref()
        ),
        listing.url.as_deref().unwrap_or("-")
    )
}

fn format_salary(from: Option<i32>, to: Option<i32>, currency: Option<&str>) -> String {
    let range = match (from, to) {
        (Some(from), Some(to)) => format!("from {from} to {to}"),
        (Some(from), None) => format!("from {from}"),
        (None, Some(to)) => format!("up to {to}"),
        (None, None) => return "not specified".to_string(),
    };
    match currency {
        Some(currency) => format!("{range} {currency}"),
        None => range,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_choices() {
        assert_eq!(parse_choice("1"), Some(Choice::Companies));
        assert_eq!(parse_choice(" 5 "), Some(Choice::KeywordSearch));
        assert_eq!(parse_choice("6"), Some(Choice::Exit));
    }

    #[test]
    fn rejects_unrecognized_input() {
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("7"), None);
        assert_eq!(parse_choice("exit"), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn formats_salary_ranges() {
        assert_eq!(
            format_salary(Some(1000), Some(2000), Some("RUR")),
            "from 1000 to 2000 RUR"
        );
        assert_eq!(format_salary(Some(1000), None, None), "from 1000");
        assert_eq!(format_salary(None, Some(2000), Some("EUR")), "up to 2000 EUR");
        assert_eq!(format_salary(None, None, Some("RUR")), "not specified");
    }

    #[test]
    fn formats_a_vacancy_line() {
        let listing = VacancyListing {
            company_name: "Acme".to_string(),
            title: "Rust Engineer".to_string(),
            salary_from: Some(250000),
            salary_to: None,
            currency: Some("RUR".to_string()),
            url: Some("https://hh.ru/vacancy/7".to_string()),
        };
        assert_eq!(
            format_vacancy_line(&listing),
            "- Acme | Rust Engineer | Salary: from 250000 RUR | https://hh.ru/vacancy/7"
        );
    }
}
