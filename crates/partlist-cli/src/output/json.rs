use partlist_core::error::PartlistError;
use partlist_core::parsing::ParsedCatalog;

pub fn print(catalog: &ParsedCatalog) -> Result<(), PartlistError> {
    let json = serde_json::to_string_pretty(catalog)?;
    println!("{json}");
    Ok(())
}
