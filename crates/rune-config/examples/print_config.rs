/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    let config = rune_config::LinesConfig::load();

    println!("=== Rune Lines Configuration ===\n");

    println!("Justify Settings:");
    println!("  Hinting: {:?}", config.justify.hinting);
    println!(
        "  Letter Spacing Fallback: {}",
        config.justify.letter_spacing_fallback
    );
    println!();

    println!("Cursor Settings:");
    println!(
        "  Paragraph Boundary Step: {}",
        config.cursor.paragraph_boundary_step
    );
    println!(
        "  Suppress Wrapped Trailing: {}",
        config.cursor.suppress_wrapped_trailing
    );
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
