//! Shared test documents and helpers for integration tests.

#![allow(dead_code)]

/// A natbib-style `.bbl` document with three convertible entries, one entry
/// without a block separator, and the usual preamble and closing lines.
pub const SAMPLE_BBL: &str = r"\begin{thebibliography}{4}
\providecommand{\natexlab}[1]{#1}
\providecommand{\url}[1]{\texttt{#1}}
\expandafter\ifx\csname urlstyle\endcsname\relax
  \providecommand{\doi}[1]{doi: #1}\else
  \providecommand{\doi}{doi: \begingroup \urlstyle{rm}\Url}\fi

\bibitem[Doe and Smith(2020)]{doe2020}
J.~Doe and A.~Smith.
\newblock A Study of Things.
\newblock \emph{Journal of Examples}, 12\penalty0 (3):\penalty0 45--67, 2020.

\bibitem[Roe et~al.(2019)Roe, Poe, and Low]{roe2019}
R.~Roe, P.~Poe, and L.~Low.
\newblock Learning to Convert Bibliographies.
\newblock In \emph{Proceedings of the Conference on Things}, pages
  100--110, 2019.

\bibitem[Web(2021)]{web2021}
Web Author.
\newblock Online Resource.
\newblock 2021.
\newblock URL \url{https://example.org/resource}.

\bibitem[Broken]{broken}
Nobody knows where this ends

\end{thebibliography}
";

/// Expected BibTeX output for [`SAMPLE_BBL`].
pub const SAMPLE_BIB: &str = "@article{doe2020,
  author = {J.~Doe and A.~Smith},
  title = {A Study of Things.},
  journal = {Journal of Examples},
  year = {2020}
}

@inproceedings{roe2019,
  author = {R.~Roe and P.~Poe and L.~Low},
  title = {Learning to Convert Bibliographies.},
  booktitle = {Proceedings of the Conference on Things},
  year = {2019}
}

@article{web2021,
  author = {Web Author},
  title = {Online Resource.},
  year = {2021},
  url = {https://example.org/resource}
}
";

/// Builds a well-formed `\bibitem` entry.
///
/// `venue` is wrapped in `\emph{}`; `in_proceedings` prefixes it with "In ".
pub fn bibitem(
    key: &str,
    authors: &str,
    title: &str,
    venue: Option<&str>,
    in_proceedings: bool,
    year: Option<&str>,
) -> String {
    let mut entry = format!("\\bibitem[{key}]{{{key}}}\n{authors}.\n\\newblock {title}.\n");
    if let Some(venue) = venue {
        let prefix = if in_proceedings { "In " } else { "" };
        entry.push_str(&format!("\\newblock {prefix}\\emph{{{venue}}}"));
        match year {
            Some(year) => entry.push_str(&format!(", {year}.\n")),
            None => entry.push_str(".\n"),
        }
    } else if let Some(year) = year {
        entry.push_str(&format!("\\newblock Publisher, {year}.\n"));
    }
    entry
}
