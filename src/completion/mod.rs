use ropey::Rope;
use tower_lsp::lsp_types::{CompletionItem, CompletionList, CompletionParams, CompletionResponse};

use crate::{config::Settings, index::MediaIndex};

use self::media_completer::MediaCompleter;

mod media_completer;

#[derive(Clone, Copy)]
pub struct Context<'a> {
    index: &'a MediaIndex,
    rope: &'a Rope,
    settings: &'a Settings,
}

pub trait Completer<'a>: Sized {
    fn construct(context: Context<'a>, line: usize, character: usize) -> Option<Self>
    where
        Self: Sized + Completer<'a>;

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized;
}

pub trait Completable<'a, T: Completer<'a>>: Sized {
    fn completions(&self, completer: &T) -> Option<CompletionItem>;
}

pub fn get_completions(
    index: &MediaIndex,
    rope: &Rope,
    params: &CompletionParams,
    settings: &Settings,
) -> Option<CompletionResponse> {
    let completion_context = Context {
        index,
        rope,
        settings,
    };

    run_completer::<MediaCompleter>(
        completion_context,
        params.text_document_position.position.line,
        params.text_document_position.position.character,
    )
}

fn run_completer<'a, T: Completer<'a>>(
    context: Context<'a>,
    line: u32,
    character: u32,
) -> Option<CompletionResponse> {
    let completer = T::construct(context, line as usize, character as usize)?;

    let completions = completer
        .completions()
        .into_iter()
        .flat_map(|completable| completable.completions(&completer))
        .collect::<Vec<CompletionItem>>();

    Some(CompletionResponse::List(CompletionList {
        is_incomplete: false,
        items: completions,
    }))
}
