// src/main.rs

use clap::{Parser, ValueEnum};
use minisharp::diagnostics::{DiagnosticBag, codes};
use minisharp::{Options, Stage};
use std::fs;
use std::io::{self, Read};
use std::process;

/// 一个类 C# 小语言的编译器前端：词法分析、语法分析与语义检查
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 需要检查的源文件路径，`-` 表示从标准输入读取
    #[arg(required_unless_present = "explain")]
    input: Option<String>,

    /// 打印某个错误码的详细说明（例如 `E0203`）后退出
    #[arg(long, value_name = "CODE")]
    explain: Option<String>,

    /// 在哪个阶段之后停止
    #[arg(long, value_enum, default_value_t = StageArg::Analyze)]
    stage: StageArg,

    /// 打印 token 列表
    #[arg(long)]
    tokens: bool,

    /// 打印语法树
    #[arg(long)]
    ast: bool,

    /// 以 `<line>: <message>` 的纯文本格式输出错误
    #[arg(long)]
    plain: bool,

    /// 关闭彩色输出
    #[arg(long)]
    no_color: bool,

    /// 存在词法或语法错误时跳过语义分析
    #[arg(long)]
    skip_analysis_on_syntax_errors: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StageArg {
    Lex,
    Parse,
    Analyze,
}

impl From<StageArg> for Stage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Lex => Stage::Lex,
            StageArg::Parse => Stage::Parse,
            StageArg::Analyze => Stage::Analyze,
        }
    }
}

fn read_source(input: &str) -> Result<(String, String), Box<dyn std::error::Error>> {
    if input == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return Ok((source, "<stdin>".to_string()));
    }
    let source = fs::read_to_string(input).map_err(|e| format!("Failed to read file '{}': {}", input, e))?;
    Ok((source, input.to_string()))
}

fn explain(code: &str) -> Result<(), Box<dyn std::error::Error>> {
    let error_code = codes::lookup(code).ok_or_else(|| format!("Unknown error code '{}'", code))?;
    println!("{}: {}\n\n{}", error_code.code, error_code.message, error_code.explanation);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if let Some(code) = &cli.explain {
        return explain(code);
    }
    let input = cli.input.as_deref().unwrap_or("-");
    let (source, source_name) = read_source(input)?;

    let options = Options {
        stop_after: cli.stage.into(),
        analyze_with_syntax_errors: !cli.skip_analysis_on_syntax_errors,
    };
    let compilation = minisharp::compile(&source, &options);

    if cli.tokens {
        for token in &compilation.tokens {
            println!("{}", token);
        }
    }
    if cli.ast && options.stop_after != Stage::Lex {
        println!("{:#?}", compilation.program);
    }

    if compilation.errors.is_empty() {
        eprintln!("No errors found in '{}'.", source_name);
        return Ok(());
    }

    // 把所有阶段的错误装进“诊断背包”统一渲染
    let mut diagnostics = DiagnosticBag::new(&source);
    diagnostics.extend(&compilation.errors);
    if cli.plain {
        print!("{}", diagnostics.render_plain());
    } else {
        diagnostics.eprint(&source_name, !cli.no_color)?;
    }

    eprintln!("Found {} error(s) in '{}'.", diagnostics.len(), source_name);
    process::exit(1);
}
