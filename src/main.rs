use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lumen_assist::speech::samples_to_wav;
use lumen_assist::{
    ApologyTone, Audience, ChatSession, Config, EmailTone, ExcuseMode, GenerationClient,
    GenerationRequest, GenerationResult, Language, LetterTone, Speaker, SummaryLength,
    ALL_LANGUAGES,
};

/// Lumen - AI-assisted writing, learning, and speech from the command line
#[derive(Parser)]
#[command(name = "lumen", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Output options shared by the generation commands
#[derive(Args)]
struct OutputOpts {
    /// Speak the result aloud after printing it
    #[arg(long)]
    speak: bool,

    /// Save the result as a text file in this directory
    #[arg(long, value_name = "DIR")]
    save: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate an excuse with a believability score
    Excuse {
        /// The situation to excuse
        situation: String,
        /// Mode: believable, funny, urgent, or professional
        #[arg(short, long, default_value = "believable")]
        mode: ExcuseMode,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Generate an apology with a sincerity score
    Apology {
        /// What to apologize for
        situation: String,
        /// Tone: sincere, formal, or casual
        #[arg(short, long, default_value = "sincere")]
        tone: ApologyTone,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Compose an email body
    Email {
        /// Points to cover
        points: String,
        /// Recipient
        #[arg(long)]
        to: String,
        /// Subject line
        #[arg(long)]
        subject: String,
        /// Tone: formal, casual, friendly, or urgent
        #[arg(short, long, default_value = "formal")]
        tone: EmailTone,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Compose a letter body
    Letter {
        /// Points to cover
        points: String,
        /// Recipient
        #[arg(long)]
        to: String,
        /// Sender
        #[arg(long)]
        from: String,
        /// Tone: formal, informal, or friendly
        #[arg(short, long, default_value = "formal")]
        tone: LetterTone,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Summarize a block of text
    Summarize {
        /// Text to summarize
        text: String,
        /// Length: short, medium, or detailed
        #[arg(short, long, default_value = "medium")]
        length: SummaryLength,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Generate a learning roadmap for a topic
    Roadmap {
        /// Topic to learn
        topic: String,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Explain a medical condition in simple terms
    Medical {
        /// Condition to explain
        condition: String,
        /// Audience: patient or student
        #[arg(short, long, default_value = "patient")]
        audience: Audience,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Translate text between supported languages
    Translate {
        /// Text to translate
        text: String,
        /// Source language
        #[arg(long, default_value = "English")]
        from: Language,
        /// Target language
        #[arg(long)]
        to: Language,
        #[command(flatten)]
        out: OutputOpts,
    },
    /// Chat with the assistant (interactive; blank line or Ctrl-D to quit)
    Chat,
    /// Synthesize speech for a text
    Speak {
        /// Text to speak
        text: String,
        /// Write a WAV file instead of playing
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List supported languages and their speech locale codes
    Languages,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn,lumen_assist=info",
        1 => "info,lumen_assist=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Command::Languages = cli.command {
        for language in ALL_LANGUAGES {
            println!("{language}\t{}", language.locale_code());
        }
        return Ok(());
    }

    // Everything else talks to the generative API
    let client = GenerationClient::new(Config::from_env()?)?;

    match cli.command {
        Command::Excuse {
            situation, mode, out,
        } => {
            let request = GenerationRequest::Excuse { situation, mode };
            generate_and_output(&client, request, out).await
        }
        Command::Apology {
            situation, tone, out,
        } => {
            let request = GenerationRequest::Apology { situation, tone };
            generate_and_output(&client, request, out).await
        }
        Command::Email {
            points,
            to,
            subject,
            tone,
            out,
        } => {
            let request = GenerationRequest::Email {
                to,
                subject,
                points,
                tone,
            };
            generate_and_output(&client, request, out).await
        }
        Command::Letter {
            points,
            to,
            from,
            tone,
            out,
        } => {
            let request = GenerationRequest::Letter {
                to,
                from,
                points,
                tone,
            };
            generate_and_output(&client, request, out).await
        }
        Command::Summarize { text, length, out } => {
            let request = GenerationRequest::Summary { text, length };
            generate_and_output(&client, request, out).await
        }
        Command::Roadmap { topic, out } => {
            let request = GenerationRequest::Roadmap { topic };
            generate_and_output(&client, request, out).await
        }
        Command::Medical {
            condition,
            audience,
            out,
        } => {
            let request = GenerationRequest::MedicalInfo {
                condition,
                audience,
            };
            generate_and_output(&client, request, out).await
        }
        Command::Translate {
            text,
            from,
            to,
            out,
        } => {
            let request = GenerationRequest::Translate { text, from, to };
            generate_and_output(&client, request, out).await
        }
        Command::Chat => chat_loop(client).await,
        Command::Speak { text, output } => speak(client, &text, output).await,
        Command::Languages => unreachable!("handled above"),
    }
}

/// Topic used for the export filename, chosen per task
fn export_topic(request: &GenerationRequest) -> String {
    match request {
        GenerationRequest::Excuse { situation, .. }
        | GenerationRequest::Apology { situation, .. } => situation.clone(),
        GenerationRequest::Email { subject, .. } => subject.clone(),
        GenerationRequest::Letter { to, .. } => to.clone(),
        GenerationRequest::Summary { .. } => String::new(),
        GenerationRequest::Roadmap { topic } => topic.clone(),
        GenerationRequest::MedicalInfo { condition, .. } => condition.clone(),
        GenerationRequest::Translate { to, .. } => to.name().to_string(),
    }
}

async fn generate_and_output(
    client: &GenerationClient,
    request: GenerationRequest,
    out: OutputOpts,
) -> anyhow::Result<()> {
    // Empty inputs never reach the API; fail fast with the real reason
    request.validate()?;

    let result = client.generate(&request).await;

    println!("{}", result.text());
    if let GenerationResult::Structured(structured) = &result {
        println!("\n{} {}%", structured.emoji, structured.percentage);
    }

    if let Some(dir) = out.save {
        let topic = export_topic(&request);
        let path = lumen_assist::export_text(&dir, request.kind(), &topic, result.text())?;
        println!("saved to {}", path.display());
    }

    if out.speak {
        Speaker::new(client.clone()).speak(result.text()).await;
    }

    Ok(())
}

async fn chat_loop(client: GenerationClient) -> anyhow::Result<()> {
    let mut session = ChatSession::new(client);
    let greeting = session.history()[0].text.clone();
    println!("{greeting}");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line == "exit" || line == "quit" {
            break;
        }

        let reply = session.send_message(line).await;
        println!("{reply}");
    }

    Ok(())
}

async fn speak(client: GenerationClient, text: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let speaker = Speaker::new(client);
            let samples = speaker.synthesize(text).await?;
            let wav = samples_to_wav(&samples, lumen_assist::speech::TTS_SAMPLE_RATE)?;
            std::fs::write(&path, wav)?;
            println!("wrote {}", path.display());
        }
        None => Speaker::new(client).speak(text).await,
    }

    Ok(())
}
